//! Reconciliation engines for ledger transactions and bank statements
//!
//! [`reconcile`] works on fully loaded inputs on the calling thread.
//! [`reconcile_concurrent`] streams both sides through parallel tasks and is
//! the one to reach for when inputs are large or arrive incrementally. Both
//! produce a [`Reconciliation`] with identical counts for identical records.

pub mod aggregate;
pub mod concurrent;
pub mod sequential;

pub use aggregate::*;
pub use concurrent::*;
pub use sequential::*;
