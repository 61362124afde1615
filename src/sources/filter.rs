//! Date-range filtering of incoming records

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Inclusive range of calendar days to reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range covering `start` through `end`, both days included
    pub fn new(start: NaiveDate, end: NaiveDate) -> ReconResult<Self> {
        if start > end {
            return Err(ReconError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range that lets every record through
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls on a day within the range
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether `time` falls between midnight of the first day and midnight
    /// after the last day
    pub fn contains_time(&self, time: NaiveDateTime) -> bool {
        self.contains_date(time.date())
    }

    pub fn contains_transaction(&self, trx: &Transaction) -> bool {
        self.contains_time(trx.time)
    }

    pub fn contains_statement(&self, line: &StatementLine) -> bool {
        self.contains_date(line.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_rejects_reversed_range() {
        assert!(matches!(
            DateRange::new(day(2, 1), day(1, 1)),
            Err(ReconError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_end_day_is_inclusive() {
        let range = DateRange::new(day(1, 1), day(1, 31)).unwrap();

        assert!(range.contains_time(day(1, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(range.contains_time(day(1, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!range.contains_time(day(2, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!range.contains_date(day(2, 1)));
        assert!(range.contains_date(day(1, 31)));
    }

    #[test]
    fn test_unbounded_accepts_extremes() {
        let range = DateRange::unbounded();
        assert!(range.contains_date(NaiveDate::MIN));
        assert!(range.contains_date(NaiveDate::MAX));
    }
}
