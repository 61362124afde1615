//! Streaming CSV reader that turns rows into typed records

use csv::StringRecord;
use std::io;

use crate::traits::*;
use crate::types::*;

/// Row layout expectations for a CSV input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether the first row is a header to skip
    pub has_header: bool,
    /// Exact number of fields every row must carry
    pub fields_per_record: usize,
}

/// Turns one CSV row into a record
pub type RowParser<T> = fn(&StringRecord) -> ReconResult<T>;

/// Decides whether a parsed record is kept
pub type RowFilter<T> = Box<dyn Fn(&T) -> bool + Send>;

/// Reads typed records out of CSV one row at a time
///
/// Rows rejected by the filter are skipped. The header, when present, is
/// consumed on the first read and never again.
pub struct CsvRecordReader<R, T> {
    reader: csv::Reader<R>,
    parse: RowParser<T>,
    keep: RowFilter<T>,
    options: CsvOptions,
    header_consumed: bool,
    row: StringRecord,
}

impl<R: io::Read, T> CsvRecordReader<R, T> {
    /// Create a reader over `input`
    pub fn new(input: R, parse: RowParser<T>, keep: RowFilter<T>, options: CsvOptions) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            parse,
            keep,
            options,
            header_consumed: false,
            row: StringRecord::new(),
        }
    }

    /// Read the next raw row, checking its width
    fn read_row(&mut self) -> ReconResult<bool> {
        if !self.reader.read_record(&mut self.row)? {
            return Ok(false);
        }
        if self.row.len() != self.options.fields_per_record {
            return Err(ReconError::FieldCount {
                line: self.row.position().map_or(0, |p| p.line()),
                expected: self.options.fields_per_record,
                found: self.row.len(),
            });
        }
        Ok(true)
    }

    /// Read the next record that passes the filter
    pub fn read(&mut self) -> ReconResult<Option<T>> {
        if self.options.has_header && !self.header_consumed {
            self.header_consumed = true;
            if !self.read_row()? {
                return Ok(None);
            }
        }
        while self.read_row()? {
            let record = (self.parse)(&self.row)?;
            if (self.keep)(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Read every remaining record that passes the filter
    pub fn read_all(&mut self) -> ReconResult<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.read()? {
            records.push(record);
        }
        Ok(records)
    }
}

impl<R: io::Read + Send, T: Send> RecordSource<T> for CsvRecordReader<R, T> {
    fn next_record(&mut self) -> ReconResult<Option<T>> {
        self.read()
    }
}
