//! In-memory record source for testing and embedding

use std::collections::VecDeque;

use crate::traits::*;
use crate::types::*;

/// Record source backed by a queue of records already in memory
///
/// Optionally fails after handing out a given number of records, which makes
/// it handy for exercising error propagation.
#[derive(Debug, Clone)]
pub struct MemorySource<T> {
    records: VecDeque<T>,
    failure: Option<(usize, String)>,
    served: usize,
}

impl<T> MemorySource<T> {
    /// Create a source that yields `records` in order, then end of stream
    pub fn new(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: records.into_iter().collect(),
            failure: None,
            served: 0,
        }
    }

    /// Return `ReconError::Source(message)` once `count` records have been served
    pub fn fail_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.failure = Some((count, message.into()));
        self
    }

    /// Records not yet handed out
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl MemorySource<LabeledStatementLine> {
    /// Flatten statement lines grouped by origin into one labelled stream,
    /// origin by origin, preserving the order inside each origin
    pub fn from_grouped<I>(statements: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<StatementLine>)>,
    {
        Self::new(statements.into_iter().flat_map(|(origin, lines)| {
            lines
                .into_iter()
                .map(move |line| LabeledStatementLine::new(origin.clone(), line))
        }))
    }
}

impl<T: Send> RecordSource<T> for MemorySource<T> {
    fn next_record(&mut self) -> ReconResult<Option<T>> {
        if let Some((count, message)) = &self.failure {
            if self.served >= *count {
                return Err(ReconError::Source(message.clone()));
            }
        }
        let record = self.records.pop_front();
        if record.is_some() {
            self.served += 1;
        }
        Ok(record)
    }
}
