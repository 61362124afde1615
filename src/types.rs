//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a monetary movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    /// Credit - money flowing in
    Credit,
    /// Debit - money flowing out
    Debit,
}

impl Polarity {
    /// Polarity implied by the sign of an amount.
    /// Negative amounts are debits, everything else (zero included) is a credit.
    pub fn of_amount(amount: &BigDecimal) -> Self {
        if *amount < BigDecimal::from(0) {
            Polarity::Debit
        } else {
            Polarity::Credit
        }
    }

    /// Canonical textual form
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Credit => "CREDIT",
            Polarity::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" | "Credit" => Ok(Polarity::Credit),
            "DEBIT" | "Debit" => Ok(Polarity::Debit),
            other => Err(ReconError::Parse {
                field: "type",
                value: other.to_string(),
                reason: "expected one of CREDIT, DEBIT".to_string(),
            }),
        }
    }
}

/// An entry of the internal ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier assigned by the ledger
    pub id: String,
    /// Amount of the transaction, direction is carried by `polarity`
    pub amount: BigDecimal,
    /// Credit or debit
    pub polarity: Polarity,
    /// When the transaction happened
    pub time: NaiveDateTime,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        id: impl Into<String>,
        amount: BigDecimal,
        polarity: Polarity,
        time: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            polarity,
            time,
        }
    }

    /// Create a credit transaction
    pub fn credit(id: impl Into<String>, amount: BigDecimal, time: NaiveDateTime) -> Self {
        Self::new(id, amount, Polarity::Credit, time)
    }

    /// Create a debit transaction
    pub fn debit(id: impl Into<String>, amount: BigDecimal, time: NaiveDateTime) -> Self {
        Self::new(id, amount, Polarity::Debit, time)
    }

    /// Calendar date of the transaction
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }
}

/// A single line of a bank statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Identifier assigned by the bank
    pub id: String,
    /// Signed amount, negative for money leaving the account
    pub amount: BigDecimal,
    /// Booking date
    pub date: NaiveDate,
}

impl StatementLine {
    /// Create a new statement line
    pub fn new(id: impl Into<String>, amount: BigDecimal, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
        }
    }

    /// Polarity implied by the sign of the amount
    pub fn polarity(&self) -> Polarity {
        Polarity::of_amount(&self.amount)
    }
}

/// A statement line together with the label of the statement it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledStatementLine {
    /// Origin of the line, usually the statement file name
    pub origin: String,
    pub line: StatementLine,
}

impl LabeledStatementLine {
    pub fn new(origin: impl Into<String>, line: StatementLine) -> Self {
        Self {
            origin: origin.into(),
            line,
        }
    }
}

/// Errors that can occur while reconciling
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Cannot parse {field} '{value}': {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Source error: {0}")]
    Source(String),
    #[error("Reconciliation task failed: {0}")]
    TaskFailed(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
