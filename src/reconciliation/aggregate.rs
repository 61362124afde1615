//! Reconciliation outcome and the aggregation of leftover records into it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Running counters of a reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Every record pulled from either side
    pub processed: usize,
    /// Two per pairing, one for each side
    pub matched: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one ingested record
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    /// Count one pairing (both of its records)
    pub fn record_match(&mut self) {
        self.matched += 2;
    }
}

/// Records that found no counterpart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unmatched {
    /// Ledger transactions without a statement line
    pub transactions: Vec<Transaction>,
    /// Statement lines without a transaction, grouped by origin label
    pub statements: BTreeMap<String, Vec<StatementLine>>,
}

/// Final outcome of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Number of records read from both sides
    pub processed: usize,
    /// Number of records consumed by a match, always even
    pub matched: usize,
    pub unmatched: Unmatched,
}

impl Reconciliation {
    /// Combine counters with the records left over once both sides are exhausted.
    ///
    /// Statement lines are grouped back under the origin label they carried at
    /// ingestion, keeping their relative order within each origin.
    pub fn assemble(
        tally: Tally,
        transactions: Vec<Transaction>,
        statements: impl IntoIterator<Item = LabeledStatementLine>,
    ) -> Self {
        let mut grouped: BTreeMap<String, Vec<StatementLine>> = BTreeMap::new();
        for LabeledStatementLine { origin, line } in statements {
            grouped.entry(origin).or_default().push(line);
        }

        Self {
            processed: tally.processed,
            matched: tally.matched,
            unmatched: Unmatched {
                transactions,
                statements: grouped,
            },
        }
    }

    /// Records that were read but not matched
    pub fn unmatched_count(&self) -> usize {
        self.processed.saturating_sub(self.matched)
    }

    pub fn unmatched_transaction_count(&self) -> usize {
        self.unmatched.transactions.len()
    }

    pub fn unmatched_statement_count(&self) -> usize {
        self.unmatched.statements.values().map(Vec::len).sum()
    }

    /// Whether every record found a counterpart
    pub fn is_fully_matched(&self) -> bool {
        self.processed == self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    #[test]
    fn test_assemble_groups_statements_by_origin() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let line = |id: &str| StatementLine::new(id, BigDecimal::from(10), date);

        let mut tally = Tally::new();
        for _ in 0..3 {
            tally.record_processed();
        }

        let result = Reconciliation::assemble(
            tally,
            Vec::new(),
            vec![
                LabeledStatementLine::new("bank2.csv", line("x")),
                LabeledStatementLine::new("bank1.csv", line("y")),
                LabeledStatementLine::new("bank2.csv", line("z")),
            ],
        );

        assert_eq!(result.processed, 3);
        assert_eq!(result.matched, 0);
        assert_eq!(result.unmatched_count(), 3);
        assert_eq!(result.unmatched_statement_count(), 3);
        assert_eq!(result.unmatched.statements["bank1.csv"], vec![line("y")]);
        assert_eq!(
            result.unmatched.statements["bank2.csv"],
            vec![line("x"), line("z")]
        );
    }

    #[test]
    fn test_empty_tally_is_fully_matched() {
        let result = Reconciliation::assemble(Tally::new(), Vec::new(), Vec::new());
        assert_eq!(result, Reconciliation::default());
        assert!(result.is_fully_matched());
    }

    #[test]
    fn test_unmatched_count_never_underflows() {
        let result = Reconciliation {
            processed: 1,
            matched: 2,
            ..Default::default()
        };
        assert_eq!(result.unmatched_count(), 0);
    }
}
