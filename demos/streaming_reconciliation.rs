//! Streaming reconciliation over CSV files

use bank_reconciliation::report::render_text;
use bank_reconciliation::sources::open_transactions;
use bank_reconciliation::{reconcile_concurrent, DateRange, StatementFiles};
use chrono::NaiveDate;
use std::fs;

const TRANSACTIONS: &str = "\
trxID,amount,type,transactionTime
1,10,CREDIT,2025-01-05 10:10:10
2,25.50,DEBIT,2025-01-06 08:00:00
3,99,CREDIT,2025-01-07 12:00:00
";

const BANK1: &str = "\
unique_identifier,amount,date
a1,10.00,2025-01-05
a2,-25.5,2025-01-06
";

const BANK2: &str = "\
unique_identifier,amount,date
b1,42,2025-01-08
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bank_reconciliation=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("🏦 Bank Reconciliation - Streaming Example\n");

    // Write sample files into a scratch directory
    let dir = std::env::temp_dir().join("bank-reconciliation-demo");
    fs::create_dir_all(&dir)?;
    let transactions_path = dir.join("transactions.csv");
    let bank_paths = vec![dir.join("bank1.csv"), dir.join("bank2.csv")];
    fs::write(&transactions_path, TRANSACTIONS)?;
    fs::write(&bank_paths[0], BANK1)?;
    fs::write(&bank_paths[1], BANK2)?;
    println!("📁 Sample files written to {}\n", dir.display());

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("invalid date")?,
        NaiveDate::from_ymd_opt(2025, 1, 31).ok_or("invalid date")?,
    )?;

    let transactions = open_transactions(&transactions_path, range)?;
    let statements = StatementFiles::open(&bank_paths, range)?;

    println!("🔍 Reconciling both streams concurrently...\n");
    let result = reconcile_concurrent(transactions, statements).await?;
    print!("{}", render_text(&result));

    fs::remove_dir_all(&dir)?;
    Ok(())
}
