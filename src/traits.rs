//! Traits for record source abstraction

use crate::types::*;

/// Pull-based stream of records
///
/// Sources are read one record at a time and may block while doing so
/// (file reads, network fetches). The reconciliation engine only ever calls
/// [`RecordSource::next_record`] and never looks at where the data comes from,
/// so the same engine works with CSV files, in-memory fixtures, or anything
/// else that can hand out records in order.
pub trait RecordSource<T>: Send {
    /// Pull the next record.
    ///
    /// Returns `Ok(Some(record))` for a record, `Ok(None)` once the stream is
    /// exhausted, and `Err(_)` when the record could not be read. End of stream
    /// is not an error. Once `Ok(None)` has been returned, further calls keep
    /// returning `Ok(None)`.
    fn next_record(&mut self) -> ReconResult<Option<T>>;
}

impl<T, S: RecordSource<T> + ?Sized> RecordSource<T> for Box<S> {
    fn next_record(&mut self) -> ReconResult<Option<T>> {
        (**self).next_record()
    }
}
