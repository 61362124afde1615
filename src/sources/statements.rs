//! Bank statement CSV input
//!
//! Expected layout, header included:
//!
//! ```text
//! unique_identifier,amount,date
//! a1,-10.50,2025-03-14
//! ```

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::StringRecord;
use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::sources::csv_reader::{CsvOptions, CsvRecordReader};
use crate::sources::filter::DateRange;
use crate::traits::*;
use crate::types::*;

/// Number of columns in a statement row
pub const STATEMENT_FIELDS: usize = 3;

/// Format of the `date` column
pub const STATEMENT_DATE_FORMAT: &str = "%Y-%m-%d";

pub type StatementReader<R> = CsvRecordReader<R, StatementLine>;

/// Parse one statement row
pub fn parse_statement(row: &StringRecord) -> ReconResult<StatementLine> {
    let amount = BigDecimal::from_str(&row[1]).map_err(|e| ReconError::Parse {
        field: "amount",
        value: row[1].to_string(),
        reason: e.to_string(),
    })?;
    let date = NaiveDate::parse_from_str(&row[2], STATEMENT_DATE_FORMAT).map_err(|e| {
        ReconError::Parse {
            field: "date",
            value: row[2].to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(StatementLine::new(&row[0], amount, date))
}

/// Stream statement lines out of `input`, keeping those inside `range`
pub fn statement_reader<R: io::Read>(input: R, range: DateRange) -> StatementReader<R> {
    CsvRecordReader::new(
        input,
        parse_statement,
        Box::new(move |line: &StatementLine| range.contains_statement(line)),
        CsvOptions {
            has_header: true,
            fields_per_record: STATEMENT_FIELDS,
        },
    )
}

/// Open a statement file for streaming
pub fn open_statements(
    path: impl AsRef<Path>,
    range: DateRange,
) -> ReconResult<StatementReader<File>> {
    let file = File::open(path)?;
    Ok(statement_reader(file, range))
}

/// Load the statement lines of several files, labelled by the path as given
pub fn load_statements<P: AsRef<Path>>(
    paths: &[P],
    range: DateRange,
) -> ReconResult<Vec<(String, Vec<StatementLine>)>> {
    paths
        .iter()
        .map(|path| -> ReconResult<(String, Vec<StatementLine>)> {
            let lines = open_statements(path, range)?.read_all()?;
            Ok((path.as_ref().display().to_string(), lines))
        })
        .collect()
}

/// Several statement inputs read back to back as one labelled stream
///
/// Every line carries the label of the input it came from. A failure in any
/// input is returned as is; only the end of the last input ends the stream.
pub struct StatementFiles<R> {
    pending: VecDeque<(String, StatementReader<R>)>,
}

impl<R: io::Read> StatementFiles<R> {
    /// Chain already opened readers, in order
    pub fn new(readers: impl IntoIterator<Item = (String, StatementReader<R>)>) -> Self {
        Self {
            pending: readers.into_iter().collect(),
        }
    }

    /// Inputs not yet exhausted
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl StatementFiles<File> {
    /// Open every file up front so a missing file fails before reading starts
    pub fn open<P: AsRef<Path>>(paths: &[P], range: DateRange) -> ReconResult<Self> {
        let readers = paths
            .iter()
            .map(|path| -> ReconResult<(String, StatementReader<File>)> {
                let label = path.as_ref().display().to_string();
                Ok((label, open_statements(path, range)?))
            })
            .collect::<ReconResult<Vec<_>>>()?;
        Ok(Self::new(readers))
    }
}

impl<R: io::Read + Send> RecordSource<LabeledStatementLine> for StatementFiles<R> {
    fn next_record(&mut self) -> ReconResult<Option<LabeledStatementLine>> {
        while let Some((label, reader)) = self.pending.front_mut() {
            if let Some(line) = reader.read()? {
                return Ok(Some(LabeledStatementLine::new(label.clone(), line)));
            }
            debug!(origin = %label, "statement input exhausted");
            self.pending.pop_front();
        }
        Ok(None)
    }
}
