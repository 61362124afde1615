//! # Bank Reconciliation
//!
//! Reconciles a ledger of internal transactions against one or more bank
//! statements and reports which records pair up and which do not.
//!
//! ## Features
//!
//! - **Matching keys**: records pair on (polarity, absolute amount, calendar date),
//!   with the polarity of a statement line taken from the sign of its amount
//! - **Duplicate-aware matching**: records sharing a key are claimed oldest first
//! - **Sequential reconciliation**: single pass over fully loaded inputs
//! - **Concurrent reconciliation**: streaming over two record sources with
//!   parallel ingestion and first-error cancellation
//! - **CSV sources**: streaming transaction and statement readers with date-range filtering
//!
//! ## Quick Start
//!
//! ```rust
//! use bank_reconciliation::{reconcile, StatementLine, Transaction};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
//! let transactions = vec![Transaction::debit(
//!     "T1",
//!     BigDecimal::from(10),
//!     day.and_hms_opt(10, 10, 10).unwrap(),
//! )];
//! let statements = vec![(
//!     "bank1.csv".to_string(),
//!     vec![StatementLine::new("S1", BigDecimal::from(-10), day)],
//! )];
//!
//! let result = reconcile(transactions, statements);
//! assert_eq!(result.processed, 2);
//! assert_eq!(result.matched, 2);
//! ```

pub mod matching;
pub mod reconciliation;
pub mod report;
pub mod sources;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use matching::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;

pub use sources::{DateRange, StatementFiles};
