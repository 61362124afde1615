//! Streaming reconciliation over two independently pulled sources
//!
//! Four tasks cooperate under one [`JoinSet`]:
//!
//! - two ingestion tasks pull from the transaction and statement sources on
//!   the blocking pool and push every record onto a hand-off queue;
//! - two indexing tasks drain those queues and apply each record to the
//!   shared `MatchingState`.
//!
//! Each record is checked against the opposite index and either paired off
//! or filed in its own index within a single lock acquisition. The first
//! source error cancels every task and is returned to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::matching::*;
use crate::reconciliation::aggregate::{Reconciliation, Tally};
use crate::traits::RecordSource;
use crate::types::*;

/// Bound of each hand-off queue. Tokio channels cannot be unbuffered, one
/// slot is the closest equivalent.
const HANDOFF_CAPACITY: usize = 1;

/// Both indices and the counters, guarded together
#[derive(Debug, Default)]
struct MatchingState {
    tally: Tally,
    transactions: MatchingIndex<Transaction>,
    statements: MatchingIndex<LabeledStatementLine>,
}

impl MatchingState {
    fn ingest_transaction(&mut self, trx: Transaction) {
        self.tally.record_processed();
        let key = trx.match_key();
        match self.statements.pop_oldest(&key) {
            Some(line) => {
                debug!(key = %key, transaction = %trx.id, statement = %line.line.id, "matched");
                self.tally.record_match();
            }
            None => self.transactions.insert(key, trx),
        }
    }

    fn ingest_statement(&mut self, line: LabeledStatementLine) {
        self.tally.record_processed();
        let key = line.match_key();
        match self.transactions.pop_oldest(&key) {
            Some(trx) => {
                debug!(key = %key, transaction = %trx.id, statement = %line.line.id, "matched");
                self.tally.record_match();
            }
            None => self.statements.insert(key, line),
        }
    }
}

fn lock(state: &Mutex<MatchingState>) -> MutexGuard<'_, MatchingState> {
    // ingest_* cannot panic midway, so a poisoned lock still holds consistent data
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pull records from `source` and forward them until end of stream.
///
/// Runs on the blocking pool. Stops quietly when cancellation is raised or the
/// receiving side has gone away.
fn pump<T, S>(mut source: S, queue: mpsc::Sender<T>, cancelled: &AtomicBool) -> ReconResult<()>
where
    S: RecordSource<T>,
{
    loop {
        if cancelled.load(Ordering::Acquire) {
            return Ok(());
        }
        match source.next_record()? {
            Some(record) => {
                if queue.blocking_send(record).is_err() {
                    return Ok(());
                }
            }
            None => return Ok(()),
        }
    }
}

/// Apply every record arriving on `queue` to the shared state until the queue
/// is closed.
async fn drain_queue<T>(
    state: Arc<Mutex<MatchingState>>,
    mut queue: mpsc::Receiver<T>,
    ingest: fn(&mut MatchingState, T),
) -> ReconResult<()> {
    while let Some(record) = queue.recv().await {
        ingest(&mut lock(&state), record);
    }
    Ok(())
}

/// Reconcile two record streams concurrently.
///
/// Produces the same counts as [`crate::reconciliation::reconcile`] over the
/// same records; the order of unmatched records may differ between runs.
/// On the first source error every task is cancelled, partial results are
/// discarded and the error is returned unchanged.
///
/// Must be called from within a multi-threaded tokio runtime.
pub async fn reconcile_concurrent<TS, SS>(
    transactions: TS,
    statements: SS,
) -> ReconResult<Reconciliation>
where
    TS: RecordSource<Transaction> + 'static,
    SS: RecordSource<LabeledStatementLine> + 'static,
{
    info!("concurrent reconciliation started");

    let state = Arc::new(Mutex::new(MatchingState::default()));
    let cancelled = Arc::new(AtomicBool::new(false));
    let (trx_tx, trx_rx) = mpsc::channel(HANDOFF_CAPACITY);
    let (stmt_tx, stmt_rx) = mpsc::channel(HANDOFF_CAPACITY);

    let mut tasks: JoinSet<ReconResult<()>> = JoinSet::new();
    tasks.spawn(drain_queue(
        Arc::clone(&state),
        trx_rx,
        MatchingState::ingest_transaction,
    ));
    tasks.spawn(drain_queue(
        Arc::clone(&state),
        stmt_rx,
        MatchingState::ingest_statement,
    ));

    let flag = Arc::clone(&cancelled);
    tasks.spawn_blocking(move || pump(transactions, trx_tx, &flag));
    let flag = Arc::clone(&cancelled);
    tasks.spawn_blocking(move || pump(statements, stmt_tx, &flag));

    let mut failure: Option<ReconError> = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => continue,
            Err(err) => Err(ReconError::TaskFailed(err.to_string())),
        };
        if let Err(err) = outcome {
            if failure.is_none() {
                warn!(error = %err, "source failed, cancelling reconciliation");
                cancelled.store(true, Ordering::Release);
                tasks.abort_all();
                failure = Some(err);
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }

    let MatchingState {
        tally,
        mut transactions,
        mut statements,
    } = std::mem::take(&mut *lock(&state));

    let result = Reconciliation::assemble(tally, transactions.drain_all(), statements.drain_all());
    info!(
        processed = result.processed,
        matched = result.matched,
        "concurrent reconciliation finished"
    );
    Ok(result)
}
