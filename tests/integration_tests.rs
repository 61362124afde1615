//! Integration tests for bank-reconciliation

use bank_reconciliation::{
    reconcile, reconcile_concurrent, utils::MemorySource, LabeledStatementLine, Polarity,
    ReconError, ReconResult, Reconciliation, RecordSource, StatementLine, Transaction,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn trx(id: &str, polarity: Polarity, amount: i64, d: u32) -> Transaction {
    Transaction::new(
        id,
        BigDecimal::from(amount),
        polarity,
        day(d).and_hms_opt(10, 10, 10).unwrap(),
    )
}

fn line(id: &str, amount: i64, d: u32) -> StatementLine {
    StatementLine::new(id, BigDecimal::from(amount), day(d))
}

type Grouped = Vec<(String, Vec<StatementLine>)>;

/// Run both reconcilers over the same records
async fn reconcile_both(
    transactions: Vec<Transaction>,
    statements: Grouped,
) -> (Reconciliation, Reconciliation) {
    let concurrent = reconcile_concurrent(
        MemorySource::new(transactions.clone()),
        MemorySource::from_grouped(statements.clone()),
    )
    .await
    .unwrap();
    (reconcile(transactions, statements), concurrent)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_empty_inputs() {
    let (sequential, concurrent) = reconcile_both(Vec::new(), Vec::new()).await;

    for result in [sequential, concurrent] {
        assert_eq!(result, Reconciliation::default());
        assert!(result.unmatched.transactions.is_empty());
        assert!(result.unmatched.statements.is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_day_match_ignores_time_of_day() {
    let transactions = vec![Transaction::credit(
        "1",
        BigDecimal::from(10),
        day(14).and_hms_opt(10, 10, 10).unwrap(),
    )];
    let statements = vec![("bank1.csv".to_string(), vec![line("10", 10, 14)])];

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 2);
        assert_eq!(result.matched, 2);
        assert!(result.is_fully_matched());
        assert!(result.unmatched.transactions.is_empty());
        assert!(result.unmatched.statements.is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_negative_amount_matches_debit() {
    let transactions = vec![
        trx("1", Polarity::Debit, 10, 14),
        trx("2", Polarity::Credit, 100, 14),
    ];
    let statements = vec![(
        "bank1.csv".to_string(),
        vec![line("10", -10, 14), line("100", 100, 14)],
    )];

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 4);
        assert_eq!(result.matched, 4);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_polarity_mismatch_does_not_match() {
    let transactions = vec![trx("1", Polarity::Credit, 10, 14)];
    let statements = vec![("bank1.csv".to_string(), vec![line("a", -10, 14)])];

    let (sequential, concurrent) = reconcile_both(transactions.clone(), statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 2);
        assert_eq!(result.matched, 0);
        assert_eq!(result.unmatched.transactions, transactions);
        assert_eq!(
            result.unmatched.statements["bank1.csv"],
            vec![line("a", -10, 14)]
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cross_file_unmatched_grouping() {
    let statements = vec![
        ("bank1.csv".to_string(), vec![line("a", 10, 14)]),
        ("bank2.csv".to_string(), vec![line("b", 10, 14)]),
    ];

    let (sequential, concurrent) = reconcile_both(Vec::new(), statements).await;

    let expected: BTreeMap<String, Vec<StatementLine>> = [
        ("bank1.csv".to_string(), vec![line("a", 10, 14)]),
        ("bank2.csv".to_string(), vec![line("b", 10, 14)]),
    ]
    .into_iter()
    .collect();

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 2);
        assert_eq!(result.matched, 0);
        assert!(result.unmatched.transactions.is_empty());
        assert_eq!(result.unmatched.statements, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_partial_match() {
    let transactions = vec![
        trx("1", Polarity::Credit, 10, 14),
        trx("2", Polarity::Credit, 20, 14),
    ];
    let statements = vec![("bank1.csv".to_string(), vec![line("a", 10, 14)])];

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 3);
        assert_eq!(result.matched, 2);
        assert_eq!(
            result.unmatched.transactions,
            vec![trx("2", Polarity::Credit, 20, 14)]
        );
        assert!(result.unmatched.statements.is_empty());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_different_dates_do_not_match() {
    let transactions = vec![trx("1", Polarity::Credit, 10, 14)];
    let statements = vec![("bank1.csv".to_string(), vec![line("a", 10, 15)])];

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 2);
        assert_eq!(result.matched, 0);
        assert_eq!(result.unmatched_count(), 2);
    }
}

#[test]
fn test_fifo_leaves_later_duplicate_unmatched() {
    let a = trx("A", Polarity::Credit, 10, 14);
    let b = trx("B", Polarity::Credit, 10, 14);

    let result = reconcile(
        vec![a, b.clone()],
        vec![("bank1.csv".to_string(), vec![line("s", 10, 14)])],
    );

    assert_eq!(result.matched, 2);
    assert_eq!(result.unmatched.transactions, vec![b]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fifo_claims_oldest_transaction() {
    let transactions: Vec<Transaction> = (0..5)
        .map(|i| trx(&i.to_string(), Polarity::Credit, 10, 14))
        .collect();

    for _ in 0..20 {
        let result = reconcile_concurrent(
            MemorySource::new(transactions.clone()),
            MemorySource::new(vec![LabeledStatementLine::new(
                "bank1.csv",
                line("s", 10, 14),
            )]),
        )
        .await
        .unwrap();

        let left: Vec<&str> = result
            .unmatched
            .transactions
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(result.matched, 2);
        assert_eq!(left, ["1", "2", "3", "4"]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicates_pair_one_to_one() {
    let transactions = vec![
        trx("1", Polarity::Credit, 10, 14),
        trx("2", Polarity::Credit, 10, 14),
        trx("3", Polarity::Credit, 10, 14),
    ];
    let statements = vec![
        ("bank1.csv".to_string(), vec![line("a", 10, 14)]),
        ("bank2.csv".to_string(), vec![line("b", 10, 14), line("c", 10, 14), line("d", 10, 14)]),
    ];

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    for result in [sequential, concurrent] {
        assert_eq!(result.processed, 7);
        assert_eq!(result.matched, 6);
        assert!(result.unmatched.transactions.is_empty());
        assert_eq!(result.unmatched_statement_count(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_streams_agree_on_counts() {
    let mut transactions = Vec::new();
    let mut statements = Vec::new();
    for i in 0..200u32 {
        let d = i % 28 + 1;
        transactions.push(trx(&format!("c{i}"), Polarity::Credit, 10, d));
        transactions.push(trx(&format!("d{i}"), Polarity::Debit, 100, d));
        let mut lines = vec![line(&format!("s{i}"), 10, d)];
        if i % 3 == 0 {
            lines.push(line(&format!("x{i}"), -100, d));
        }
        if i % 5 == 0 {
            lines.push(line(&format!("y{i}"), 7, d));
        }
        statements.push((format!("bank{i}.csv"), lines));
    }

    let (sequential, concurrent) = reconcile_both(transactions, statements).await;

    assert_eq!(sequential.processed, concurrent.processed);
    assert_eq!(sequential.matched, concurrent.matched);
    assert_eq!(
        sequential.unmatched_transaction_count(),
        concurrent.unmatched_transaction_count()
    );
    assert_eq!(
        sequential.unmatched_statement_count(),
        concurrent.unmatched_statement_count()
    );
    assert_eq!(sequential.processed, 400 + 200 + 67 + 40);
    assert_eq!(sequential.matched, 2 * (200 + 67));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_transaction_source_error_aborts_run() {
    let transactions = MemorySource::new(vec![
        trx("1", Polarity::Credit, 10, 14),
        trx("2", Polarity::Credit, 20, 14),
    ])
    .fail_after(1, "transactions.csv: bad row");
    let statements = MemorySource::new(vec![LabeledStatementLine::new(
        "bank1.csv",
        line("a", 10, 14),
    )]);

    let err = reconcile_concurrent(transactions, statements)
        .await
        .unwrap_err();

    assert!(matches!(err, ReconError::Source(msg) if msg == "transactions.csv: bad row"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_statement_source_error_is_not_end_of_stream() {
    // A failing statement source must surface as an error rather than be
    // treated as a normally finished stream.
    let statements = MemorySource::from_grouped(vec![(
        "bank1.csv".to_string(),
        vec![line("a", 10, 14), line("b", 20, 14)],
    )])
    .fail_after(1, "bank1.csv: truncated");

    let result = reconcile_concurrent(
        MemorySource::new(vec![trx("1", Polarity::Credit, 10, 14)]),
        statements,
    )
    .await;

    match result {
        Err(ReconError::Source(msg)) => assert_eq!(msg, "bank1.csv: truncated"),
        other => panic!("expected a source error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_immediate_error_with_idle_peer() {
    let transactions = MemorySource::<Transaction>::new(Vec::new()).fail_after(0, "unreadable");
    let statements = MemorySource::from_grouped(vec![(
        "bank1.csv".to_string(),
        (0..50).map(|i| line(&i.to_string(), i, 14)).collect(),
    )]);

    let err = reconcile_concurrent(transactions, statements)
        .await
        .unwrap_err();

    assert!(matches!(err, ReconError::Source(_)));
}


/// A transaction feed that never runs dry
struct Endless {
    pulled: Arc<AtomicUsize>,
}

impl RecordSource<Transaction> for Endless {
    fn next_record(&mut self) -> ReconResult<Option<Transaction>> {
        let n = self.pulled.fetch_add(1, Ordering::Relaxed);
        Ok(Some(trx(&n.to_string(), Polarity::Credit, 10, 14)))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_first_error_stops_endless_peer() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let transactions = Endless {
        pulled: Arc::clone(&pulled),
    };
    let statements =
        MemorySource::<LabeledStatementLine>::new(Vec::new()).fail_after(0, "bank1.csv: unreadable");

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        reconcile_concurrent(transactions, statements),
    )
    .await
    .expect("an endless source must be cancelled by the first error");

    assert!(matches!(outcome, Err(ReconError::Source(msg)) if msg == "bank1.csv: unreadable"));

    // every task has been joined, so the endless source is no longer pulled
    let settled = pulled.load(Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(pulled.load(Ordering::Relaxed), settled);
}
