use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    invariants::{ASSET_SUFFIXES, HourStart, TRACKED_STATUSES},
    models::LogRecord,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    pub hour: HourStart,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub status: String,
    pub paths: Vec<ReportEntry>,
}

/// Field selectors for [`Analytics::top_n`].
pub mod field {
    use crate::models::LogRecord;

    pub fn ip(r: &LogRecord) -> Option<&str> {
        Some(r.ip.as_str())
    }
    pub fn path(r: &LogRecord) -> Option<&str> {
        r.path.as_deref()
    }
    pub fn user_agent(r: &LogRecord) -> Option<&str> {
        Some(r.user_agent.as_str())
    }
    pub fn referrer(r: &LogRecord) -> Option<&str> {
        Some(r.referrer.as_str())
    }
}

fn is_asset(r: &LogRecord) -> bool {
    r.path.as_deref().is_some_and(|p| {
        let p = p.to_lowercase();
        ASSET_SUFFIXES.iter().any(|suffix| p.ends_with(suffix))
    })
}

fn is_bot(r: &LogRecord) -> bool {
    r.user_agent.to_lowercase().contains("bot")
}

fn is_wordpress_probe(r: &LogRecord) -> bool {
    r.path
        .as_deref()
        .is_some_and(|p| p.to_lowercase().contains("/wp-"))
}

fn has_referrer(r: &LogRecord) -> bool {
    !r.referrer.is_empty() && r.referrer != "-"
}

/// Frequency reports over an already time-filtered set of records.
#[derive(Debug)]
pub struct Analytics<'a> {
    records: Vec<&'a LogRecord>,
    top: usize,
}

impl<'a> Analytics<'a> {
    pub fn new(records: Vec<&'a LogRecord>, top: usize) -> Self {
        Self { records, top }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Requests per hour, oldest first. Empty hours are left out.
    pub fn hourly(&self) -> Vec<HourlyBucket> {
        let mut by_hour: BTreeMap<HourStart, usize> = BTreeMap::new();
        for r in &self.records {
            *by_hour.entry(r.timestamp.into()).or_default() += 1;
        }
        by_hour
            .into_iter()
            .map(|(hour, count)| HourlyBucket { hour, count })
            .collect()
    }

    /// Counts `field` over the records accepted by `keep`.
    ///
    /// Sorted by count, highest first; equal counts keep the order in which
    /// the keys were first seen. Records with no value for `field` are skipped.
    pub fn top_n<F, P>(&self, field: F, keep: P) -> Vec<ReportEntry>
    where
        F: for<'r> Fn(&'r LogRecord) -> Option<&'r str>,
        P: Fn(&LogRecord) -> bool,
    {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for r in self.records.iter().copied().filter(|&r| keep(r)) {
            if let Some(key) = field(r) {
                *counts.entry(key).or_default() += 1;
            }
        }
        let mut entries: Vec<_> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .take(self.top)
            .map(|(key, count)| ReportEntry {
                key: key.to_owned(),
                count,
            })
            .collect()
    }

    pub fn asset_hits(&self) -> Vec<ReportEntry> {
        self.top_n(field::path, is_asset)
    }

    pub fn bot_traffic(&self) -> Vec<ReportEntry> {
        self.top_n(field::user_agent, is_bot)
    }

    pub fn wordpress_abuse(&self) -> Vec<ReportEntry> {
        self.top_n(field::path, is_wordpress_probe)
    }

    pub fn top_ips(&self) -> Vec<ReportEntry> {
        self.top_n(field::ip, |_| true)
    }

    pub fn user_agents(&self) -> Vec<ReportEntry> {
        self.top_n(field::user_agent, |_| true)
    }

    pub fn referrers(&self) -> Vec<ReportEntry> {
        self.top_n(field::referrer, has_referrer)
    }

    pub fn paths_with_status(&self, status: &str) -> Vec<ReportEntry> {
        self.top_n(field::path, |r| r.status == status)
    }

    /// One breakdown per tracked status, 404 first.
    pub fn status_breakdown(&self) -> Vec<StatusBreakdown> {
        TRACKED_STATUSES
            .iter()
            .map(|status| StatusBreakdown {
                status: (*status).to_owned(),
                paths: self.paths_with_status(status),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{invariants::DEFAULT_TOP, parser::parse_line, window};
    use asserting::prelude::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(ip: &str, path: Option<&str>, status: &str, referrer: &str, ua: &str) -> LogRecord {
        LogRecord {
            ip: ip.into(),
            timestamp: at(10, 10, 0),
            method: path.map(|_| "GET".into()),
            path: path.map(Into::into),
            status: status.into(),
            referrer: referrer.into(),
            user_agent: ua.into(),
        }
    }

    fn entries(pairs: &[(&str, usize)]) -> Vec<ReportEntry> {
        pairs
            .iter()
            .map(|(key, count)| ReportEntry {
                key: (*key).into(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn top_n_orders_by_count_then_first_seen() {
        let records: Vec<_> = ["c", "a", "b", "a", "b", "d"]
            .into_iter()
            .map(|ip| record(ip, Some("/"), "200", "-", "ua"))
            .collect();
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.top_ips()).is_equal_to(entries(&[("a", 2), ("b", 2), ("c", 1), ("d", 1)]));
    }

    #[test]
    fn top_n_is_capped() {
        let records: Vec<_> = (0..100)
            .map(|i| record(&format!("10.0.0.{i}"), Some("/"), "200", "-", "ua"))
            .collect();
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        let top = analytics.top_ips();
        assert_that!(top.len()).is_equal_to(DEFAULT_TOP);
        assert_eq!(top[0].key, "10.0.0.0");
        assert_eq!(top[29].key, "10.0.0.29");

        let narrow = Analytics::new(records.iter().collect(), 3);
        assert_that!(narrow.top_ips().len()).is_equal_to(3);
    }

    #[test]
    fn asset_hits_match_suffix_case_insensitively() {
        let records = vec![
            record("1", Some("/app.JS"), "200", "-", "ua"),
            record("1", Some("/logo.png"), "200", "-", "ua"),
            record("1", Some("/logo.png"), "304", "-", "ua"),
            record("1", Some("/style.css?v=2"), "200", "-", "ua"),
            record("1", Some("/index.html"), "200", "-", "ua"),
            record("1", None, "400", "-", "ua"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.asset_hits()).is_equal_to(entries(&[("/logo.png", 2), ("/app.JS", 1)]));
    }

    #[test]
    fn bot_traffic_matches_user_agent_substring() {
        let records = vec![
            record("1", Some("/"), "200", "-", "Googlebot/2.1"),
            record("1", Some("/"), "200", "-", "Mozilla/5.0"),
            record("1", Some("/"), "200", "-", "AhrefsBot/7.0"),
            record("1", Some("/"), "200", "-", "Googlebot/2.1"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.bot_traffic())
            .is_equal_to(entries(&[("Googlebot/2.1", 2), ("AhrefsBot/7.0", 1)]));
    }

    #[test]
    fn wordpress_abuse_matches_wp_prefix_anywhere() {
        let records = vec![
            record("1", Some("/blog/WP-admin/"), "302", "-", "ua"),
            record("1", Some("/wp-login.php"), "404", "-", "ua"),
            record("1", Some("/wordpress"), "404", "-", "ua"),
            record("1", Some("/wp-login.php"), "404", "-", "ua"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.wordpress_abuse())
            .is_equal_to(entries(&[("/wp-login.php", 2), ("/blog/WP-admin/", 1)]));
    }

    #[test]
    fn referrers_skip_placeholder_and_empty() {
        let records = vec![
            record("1", Some("/"), "200", "-", "ua"),
            record("1", Some("/"), "200", "", "ua"),
            record("1", Some("/"), "200", "https://a.example/", "ua"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.referrers()).is_equal_to(entries(&[("https://a.example/", 1)]));
    }

    #[test]
    fn user_agents_count_everything() {
        let records = vec![
            record("1", Some("/"), "200", "-", ""),
            record("1", Some("/"), "200", "-", "curl/8"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        assert_that!(analytics.user_agents()).is_equal_to(entries(&[("", 1), ("curl/8", 1)]));
    }

    #[test]
    fn status_breakdown_covers_tracked_codes_in_order() {
        let records = vec![
            record("1", Some("/missing"), "404", "-", "ua"),
            record("1", Some("/boom"), "500", "-", "ua"),
            record("1", Some("/missing"), "404", "-", "ua"),
            record("1", None, "404", "-", "ua"),
            record("1", Some("/ok"), "200", "-", "ua"),
        ];
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        let breakdown = analytics.status_breakdown();
        let codes: Vec<_> = breakdown.iter().map(|b| b.status.as_str()).collect();
        assert_that!(codes).is_equal_to(vec!["404", "500", "403", "503"]);
        assert_eq!(breakdown[0].paths, entries(&[("/missing", 2)]));
        assert_eq!(breakdown[1].paths, entries(&[("/boom", 1)]));
        assert!(breakdown[2].paths.is_empty());
        assert!(breakdown[3].paths.is_empty());
    }

    #[test]
    fn hourly_histogram_is_sparse_sorted_and_complete() {
        let mut records = Vec::new();
        for (day, h, m) in [(10, 14, 5), (10, 9, 59), (10, 14, 59), (11, 0, 0), (10, 9, 0)] {
            let mut r = record("1", Some("/"), "200", "-", "ua");
            r.timestamp = at(day, h, m);
            records.push(r);
        }
        let analytics = Analytics::new(records.iter().collect(), DEFAULT_TOP);
        let hourly = analytics.hourly();

        let hours: Vec<_> = hourly
            .iter()
            .map(|b| *AsRef::<NaiveDateTime>::as_ref(&b.hour))
            .collect();
        assert_that!(hours).is_equal_to(vec![at(10, 9, 0), at(10, 14, 0), at(11, 0, 0)]);
        assert_that!(hourly.iter().map(|b| b.count).sum::<usize>()).is_equal_to(analytics.len());
        assert!(hourly.iter().all(|b| b.count > 0));
    }

    #[test]
    fn two_line_walkthrough() {
        let records: Vec<_> = [
            r#"1.2.3.4 - - [10/Jan/2024:10:15:00 +0000] "GET /index.html HTTP/1.1" 200 512 "-" "Mozilla/5.0""#,
            r#"5.6.7.8 - - [10/Jan/2024:10:45:00 +0000] "GET /wp-login.php HTTP/1.1" 404 256 "-" "curl/7.0""#,
        ]
        .into_iter()
        .filter_map(parse_line)
        .collect();
        let analytics = Analytics::new(window::since(&records, at(10, 0, 0)), DEFAULT_TOP);

        assert_that!(analytics.hourly()).is_equal_to(vec![HourlyBucket {
            hour: at(10, 10, 0).into(),
            count: 2,
        }]);
        assert_that!(analytics.wordpress_abuse()).is_equal_to(entries(&[("/wp-login.php", 1)]));
        assert_that!(analytics.paths_with_status("404")).is_equal_to(entries(&[("/wp-login.php", 1)]));
        assert_that!(analytics.referrers()).is_empty();
        assert_that!(analytics.bot_traffic()).is_empty();
    }
}
