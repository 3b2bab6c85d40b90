use chrono::NaiveDateTime;

use crate::models::LogRecord;

/// Keeps the records at or after `start`. There is no upper bound.
pub fn since(records: &[LogRecord], start: NaiveDateTime) -> Vec<&LogRecord> {
    records.iter().filter(|r| r.timestamp >= start).collect()
}
