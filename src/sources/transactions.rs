//! Ledger transaction CSV input
//!
//! Expected layout, header included:
//!
//! ```text
//! trxID,amount,type,transactionTime
//! 1,10.50,CREDIT,2025-03-14 10:10:10
//! ```

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use csv::StringRecord;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::sources::csv_reader::{CsvOptions, CsvRecordReader};
use crate::sources::filter::DateRange;
use crate::types::*;

/// Number of columns in a transaction row
pub const TRANSACTION_FIELDS: usize = 4;

/// Format of the `transactionTime` column
pub const TRANSACTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub type TransactionReader<R> = CsvRecordReader<R, Transaction>;

/// Parse one transaction row
pub fn parse_transaction(row: &StringRecord) -> ReconResult<Transaction> {
    let amount = BigDecimal::from_str(&row[1]).map_err(|e| ReconError::Parse {
        field: "amount",
        value: row[1].to_string(),
        reason: e.to_string(),
    })?;
    let polarity = Polarity::from_str(&row[2])?;
    let time = NaiveDateTime::parse_from_str(&row[3], TRANSACTION_TIME_FORMAT).map_err(|e| {
        ReconError::Parse {
            field: "transactionTime",
            value: row[3].to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(Transaction::new(&row[0], amount, polarity, time))
}

/// Stream transactions out of `input`, keeping those inside `range`
pub fn transaction_reader<R: io::Read>(input: R, range: DateRange) -> TransactionReader<R> {
    CsvRecordReader::new(
        input,
        parse_transaction,
        Box::new(move |trx: &Transaction| range.contains_transaction(trx)),
        CsvOptions {
            has_header: true,
            fields_per_record: TRANSACTION_FIELDS,
        },
    )
}

/// Open a transaction file for streaming
pub fn open_transactions(
    path: impl AsRef<Path>,
    range: DateRange,
) -> ReconResult<TransactionReader<File>> {
    let file = File::open(path)?;
    Ok(transaction_reader(file, range))
}

/// Load every transaction of a file that falls inside `range`
pub fn load_transactions(path: impl AsRef<Path>, range: DateRange) -> ReconResult<Vec<Transaction>> {
    open_transactions(path, range)?.read_all()
}
