use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::LogRecord;

// 1.2.3.4 - - [10/Jan/2024:10:15:00 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0"
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<ip>\S+) \S+ \S+ \[(?P<datetime>[^\]]+)] "(?P<method>\S+)? (?P<path>\S+)? \S+" (?P<status>\d{3}) \S+ "(?P<referrer>[^"]*)" "(?P<useragent>[^"]*)""#,
    )
    .expect("valid line pattern")
});

const TS_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Parses one combined-format access log line.
///
/// Returns `None` when the line does not have the expected shape or its
/// timestamp is unreadable. Anything after the closing user-agent quote is
/// ignored, as is the timezone offset.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let caps = LINE_PATTERN.captures(line)?;
    let datetime = caps.name("datetime")?.as_str().split_whitespace().next()?;
    let timestamp = NaiveDateTime::parse_from_str(datetime, TS_FORMAT).ok()?;
    let text = |name: &str| caps.name(name).map(|m| m.as_str().to_owned());

    Some(LogRecord {
        ip: text("ip")?,
        timestamp,
        method: text("method"),
        path: text("path"),
        status: text("status")?,
        referrer: text("referrer")?,
        user_agent: text("useragent")?,
    })
}
