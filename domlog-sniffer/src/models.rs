use chrono::NaiveDateTime;

/// One request line from a domlog.
///
/// The timestamp is naive: the offset written in the log is dropped, so logs
/// recorded under different offsets share one clock and may land in the wrong
/// hourly bucket relative to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub ip: String,
    pub timestamp: NaiveDateTime,
    pub method: Option<String>,
    pub path: Option<String>,
    pub status: String,
    pub referrer: String,
    pub user_agent: String,
}
