use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

const SINCE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection: `{0}` (expected 1 or 2).")]
    UnknownOption(String),
    #[error("Invalid number of minutes: `{0}`.")]
    InvalidMinutes(String),
    #[error("Invalid date format: `{0}` (expected YYYY-mm-dd HH:MM).")]
    InvalidDate(String),
    #[error("No domain given.")]
    MissingDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    LastMinutes(u32),
    Since(NaiveDateTime),
}

impl Timeframe {
    /// First instant of the window, relative to `now` for [`Timeframe::LastMinutes`].
    pub fn start_instant(self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::LastMinutes(minutes) => now - TimeDelta::minutes(i64::from(minutes)),
            Self::Since(start) => start,
        }
    }
}

pub fn parse_minutes(input: &str) -> Result<u32, SelectionError> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| SelectionError::InvalidMinutes(input.to_owned()))
}

pub fn parse_since(input: &str) -> Result<NaiveDateTime, SelectionError> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, SINCE_FORMAT)
        .map_err(|_| SelectionError::InvalidDate(input.to_owned()))
}
