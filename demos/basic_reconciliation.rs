//! Basic reconciliation example

use bank_reconciliation::report::render_text;
use bank_reconciliation::{reconcile, MatchKey, Keyed, StatementLine, Transaction};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Bank Reconciliation - Basic Example\n");

    let day = |d: u32| NaiveDate::from_ymd_opt(2025, 3, d).ok_or("invalid date");
    let at = |d: u32, h: u32, m: u32| -> Result<_, &str> {
        day(d)?.and_hms_opt(h, m, 0).ok_or("invalid time")
    };

    // 1. The ledger side
    println!("📒 Ledger transactions...");
    let transactions = vec![
        Transaction::credit("TRX-001", BigDecimal::from(1500), at(14, 9, 30)?),
        Transaction::debit("TRX-002", BigDecimal::from_str("250.75")?, at(14, 15, 5)?),
        Transaction::credit("TRX-003", BigDecimal::from(1500), at(15, 11, 0)?),
        Transaction::debit("TRX-004", BigDecimal::from(80), at(16, 18, 45)?),
    ];
    for trx in &transactions {
        println!("  ✓ {} {} {} on {}", trx.id, trx.polarity, trx.amount, trx.time);
    }
    println!();

    // 2. Two bank statements
    println!("📄 Bank statements...");
    let statements = vec![
        (
            "bank1.csv".to_string(),
            vec![
                StatementLine::new("B1-01", BigDecimal::from_str("1500.00")?, day(14)?),
                StatementLine::new("B1-02", BigDecimal::from_str("-250.75")?, day(14)?),
            ],
        ),
        (
            "bank2.csv".to_string(),
            vec![
                StatementLine::new("B2-01", BigDecimal::from(1500), day(15)?),
                StatementLine::new("B2-02", BigDecimal::from(-12), day(16)?),
            ],
        ),
    ];
    for (origin, lines) in &statements {
        for line in lines {
            let key: MatchKey = line.match_key();
            println!("  ✓ {origin}: {} {} (key {key})", line.id, line.amount);
        }
    }
    println!();

    // 3. Reconcile
    println!("🔍 Reconciling...\n");
    let result = reconcile(transactions, statements);
    print!("{}", render_text(&result));

    Ok(())
}
