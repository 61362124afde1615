//! Command-line front end: reconcile a transaction file against statement files.
//!
//! Usage:
//!   reconcile transactions.csv bank1.csv,bank2.csv 2025-01-01 2025-01-31
//!   reconcile --concurrent --format json transactions.csv bank1.csv 2025-01-01 2025-01-31

use std::path::PathBuf;
use std::process::ExitCode;

use bank_reconciliation::report::{render, ReportFormat};
use bank_reconciliation::sources::{load_statements, load_transactions, open_transactions};
use bank_reconciliation::{
    reconcile, reconcile_concurrent, DateRange, ReconResult, Reconciliation, StatementFiles,
};
use chrono::NaiveDate;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "reconcile")]
#[command(author, version, about = "Reconcile ledger transactions against bank statements", long_about = None)]
struct Args {
    /// The system's transaction CSV file
    #[arg(value_name = "TRANSACTIONS")]
    transactions: PathBuf,

    /// The bank's statement CSV files, comma separated (e.g. bank1.csv,bank2.csv)
    #[arg(value_name = "STATEMENTS")]
    statements: String,

    /// First day to reconcile (e.g. 2025-01-02)
    #[arg(value_name = "START")]
    start: NaiveDate,

    /// Last day to reconcile, inclusive (e.g. 2025-12-31)
    #[arg(value_name = "END")]
    end: NaiveDate,

    /// Stream both sides through the concurrent reconciler
    #[arg(long)]
    concurrent: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Log matching decisions, on top of any RUST_LOG directives
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn statement_paths(&self) -> Vec<PathBuf> {
        self.statements
            .split(',')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

async fn run(args: &Args) -> ReconResult<Reconciliation> {
    let range = DateRange::new(args.start, args.end)?;
    let statement_paths = args.statement_paths();

    if args.concurrent {
        let transactions = open_transactions(&args.transactions, range)?;
        let statements = StatementFiles::open(&statement_paths, range)?;
        reconcile_concurrent(transactions, statements).await
    } else {
        let transactions = load_transactions(&args.transactions, range)?;
        let statements = load_statements(&statement_paths, range)?;
        Ok(reconcile(transactions, statements))
    }
}

/// Filter directives from `RUST_LOG`, with `-v` layered last so it wins for this crate
fn log_directives(verbose: bool, env: Option<String>) -> String {
    let base = env
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| "bank_reconciliation=info".to_string());
    if verbose {
        format!("{base},bank_reconciliation=debug")
    } else {
        base
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // logs go to stderr, stdout carries the report
    let directives = log_directives(args.verbose, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .init();

    let report = run(&args)
        .await
        .and_then(|result| render(&result, args.format));
    match report {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Reconciliation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
