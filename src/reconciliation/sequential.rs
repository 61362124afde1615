//! In-memory reconciliation over fully materialised inputs

use tracing::{debug, info};

use crate::matching::*;
use crate::reconciliation::aggregate::{Reconciliation, Tally};
use crate::types::*;

/// Reconcile a complete set of transactions against statement lines grouped
/// by origin label.
///
/// Transactions are indexed first; statement lines are then matched in the
/// order given, origin by origin, against that single shared index. A
/// transaction can therefore be claimed by a line from any origin, and the
/// earliest transaction with a given key is claimed first.
pub fn reconcile<I>(transactions: Vec<Transaction>, statements: I) -> Reconciliation
where
    I: IntoIterator<Item = (String, Vec<StatementLine>)>,
{
    let mut tally = Tally::new();
    let mut index = MatchingIndex::with_capacity(transactions.len());

    for trx in transactions {
        tally.record_processed();
        index.insert(trx.match_key(), trx);
    }

    let mut leftover = Vec::new();
    for (origin, lines) in statements {
        for line in lines {
            tally.record_processed();
            let key = line.match_key();
            match index.pop_oldest(&key) {
                Some(trx) => {
                    debug!(key = %key, transaction = %trx.id, statement = %line.id, "matched");
                    tally.record_match();
                }
                None => leftover.push(LabeledStatementLine::new(origin.clone(), line)),
            }
        }
    }

    let result = Reconciliation::assemble(tally, index.drain_all(), leftover);
    info!(
        processed = result.processed,
        matched = result.matched,
        "sequential reconciliation finished"
    );
    result
}
