use std::io::{self, Write};

use chrono::NaiveDateTime;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::analytics::{Analytics, HourlyBucket, ReportEntry, StatusBreakdown};

const BANNER: &str = r"
  DDDD    OOO   M   M  L      OOO   GGGG     SSSS  N   N  III FFFFF  FFFFF  EEEEE  RRRRR
  D   D  O   O  MM MM  L     O   O  G        S     NN  N   I  F      F      E      R   R
  D   D  O   O  M M M  L     O   O  G  GG     SSS  N N N   I  FFFF   FFFF   EEEE   RRRRR
  D   D  O   O  M   M  L     O   O  G   G       S  N  NN   I  F      F      E      R  R
  DDDD    OOO   M   M  LLLLL  OOO   GGGGG    SSSS  N   N  III F      F      EEEEE  R   R
";
const RULE: &str = "-----------------------------------";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "=============================================")?;
    writeln!(out, "             Domlog Sniffer v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "=============================================")?;
    writeln!(out, "  Description: Apache domlog analysis tool")?;
    writeln!(out, "=============================================")
}

/// Everything computed for one run, ready to print or serialise.
#[derive(Debug, Serialize)]
pub struct Report {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub top: usize,
    pub records_parsed: usize,
    pub records_in_window: usize,
    pub hourly: Vec<HourlyBucket>,
    pub asset_hits: Vec<ReportEntry>,
    pub bot_traffic: Vec<ReportEntry>,
    pub wordpress_abuse: Vec<ReportEntry>,
    pub top_ips: Vec<ReportEntry>,
    pub user_agents: Vec<ReportEntry>,
    pub referrers: Vec<ReportEntry>,
    pub status_breakdown: Vec<StatusBreakdown>,
}

impl Report {
    pub fn build(
        analytics: &Analytics<'_>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        records_parsed: usize,
        top: usize,
    ) -> Self {
        Self {
            start,
            end,
            top,
            records_parsed,
            records_in_window: analytics.len(),
            hourly: analytics.hourly(),
            asset_hits: analytics.asset_hits(),
            bot_traffic: analytics.bot_traffic(),
            wordpress_abuse: analytics.wordpress_abuse(),
            top_ips: analytics.top_ips(),
            user_agents: analytics.user_agents(),
            referrers: analytics.referrers(),
            status_breakdown: analytics.status_breakdown(),
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} requests parsed, {} in timeframe",
            self.records_parsed.to_formatted_string(&Locale::en),
            self.records_in_window.to_formatted_string(&Locale::en),
        )?;

        section(out, "Requests Breakdown by Hour")?;
        for bucket in &self.hourly {
            writeln!(out, "{}: {} requests", bucket.hour, bucket.count)?;
        }

        let top = self.top;
        ranked(out, &format!("Top Asset Hits (Top {top})"), &self.asset_hits)?;
        ranked(out, &format!("Checking for Bot Traffic (Top {top})"), &self.bot_traffic)?;
        ranked(out, &format!("Checking for WordPress Abuse (Top {top})"), &self.wordpress_abuse)?;
        ranked(out, &format!("Top Hits Sorted by IP Address (Top {top})"), &self.top_ips)?;
        ranked(out, &format!("User-Agent Analysis (Top {top})"), &self.user_agents)?;
        ranked(out, &format!("Referrer Analysis (Top {top})"), &self.referrers)?;
        for breakdown in &self.status_breakdown {
            let title = format!("{} Requests Analysis (Top {top})", breakdown.status);
            ranked(out, &title, &breakdown.paths)?;
        }

        writeln!(out, "\nAnalysis complete!")
    }

    pub fn timeframe_line(&self) -> String {
        format!(
            "Timeframe: {} to {}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n{RULE}\n{title}\n{RULE}")
}

fn ranked<W: Write>(out: &mut W, title: &str, entries: &[ReportEntry]) -> io::Result<()> {
    section(out, title)?;
    for entry in entries {
        writeln!(out, "{} {}", entry.count, entry.key)?;
    }
    Ok(())
}
