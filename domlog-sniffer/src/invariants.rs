use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use derive_more::{AsRef, Debug, Display};
use serde::Serialize;

/// Start of the hour a request falls into.
#[derive(Debug, Display, AsRef, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HourStart(NaiveDateTime);

impl From<NaiveDateTime> for HourStart {
    fn from(value: NaiveDateTime) -> Self {
        let midnight = value.date().and_time(NaiveTime::MIN);
        Self(midnight + TimeDelta::hours(i64::from(value.hour())))
    }
}

/// Status codes that get their own per-path breakdown, in report order.
pub const TRACKED_STATUSES: [&str; 4] = ["404", "500", "403", "503"];

/// Suffixes counted as static asset hits.
pub const ASSET_SUFFIXES: [&str; 5] = [".js", ".css", ".jpg", ".png", ".gif"];

/// Default cap for every top-N report.
pub const DEFAULT_TOP: usize = 30;
