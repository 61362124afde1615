//! Matching primitives shared by the sequential and concurrent reconcilers

pub mod index;
pub mod key;

pub use index::*;
pub use key::*;
