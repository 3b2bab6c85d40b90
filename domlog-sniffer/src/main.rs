mod analytics;
mod discover;
mod error;
mod ingest;
mod invariants;
mod models;
mod parser;
mod prompt;
mod report;
mod timeframe;
mod window;
mod worker;

use std::{
    io::{self, Write},
    num::NonZero,
    path::PathBuf,
    process::ExitCode,
};

use analytics::Analytics;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use error::AppError;
use invariants::DEFAULT_TOP;
use prompt::{Console, check_domain};
use report::Report;
use timeframe::{Timeframe, parse_since};
use tokio::task;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIR: &str = "/usr/local/apache/domlogs";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Apache domlog analysis tool", long_about = None)]
struct Args {
    /// Directory searched (recursively) for domlogs
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Domain whose logs are analysed; asked for when omitted
    #[arg(long)]
    domain: Option<String>,

    /// Only look at the last N minutes
    #[arg(long, conflicts_with = "since")]
    minutes: Option<u32>,

    /// Only look at requests from this local time on, "YYYY-mm-dd HH:MM"
    #[arg(long, value_parser = parse_since)]
    since: Option<NaiveDateTime>,

    /// Files parsed in parallel; defaults to the number of cores
    #[arg(long)]
    workers: Option<NonZero<usize>>,

    /// Entries kept per ranking
    #[arg(long, default_value_t = DEFAULT_TOP)]
    top: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Skip the banner and the list of files found
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn timeframe(&self) -> Option<Timeframe> {
        self.minutes
            .map(Timeframe::LastMinutes)
            .or(self.since.map(Timeframe::Since))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let mut out = io::stdout();
    let chatty = args.format == OutputFormat::Text && !args.quiet;
    if chatty {
        report::write_banner(&mut out)?;
    }

    let (given_domain, given_timeframe) = (args.domain.clone(), args.timeframe());
    let (domain, timeframe) =
        task::spawn_blocking(move || collect_inputs(given_domain, given_timeframe)).await??;

    let now = Local::now().naive_local();
    let start = timeframe.start_instant(now);

    let files = discover::discover(&args.log_dir, &domain)?;
    if files.is_empty() {
        match args.format {
            OutputFormat::Text => writeln!(out, "No log files found.")?,
            OutputFormat::Json => {
                eprintln!("No log files found.");
                let nothing = Analytics::new(Vec::new(), args.top);
                write_json(&mut out, &Report::build(&nothing, start, now, 0, args.top))?;
            }
        }
        return Ok(());
    }
    if chatty {
        writeln!(out, "Found log files:")?;
        for file in &files {
            writeln!(out, " - {}", file.display())?;
        }
    }

    let workers = args.workers.unwrap_or_else(worker::default_pool_size);
    if chatty {
        writeln!(out, "\nProcessing logs with {workers} workers...")?;
    }

    let records = worker::ingest(&files, workers).await?;
    let analytics = Analytics::new(window::since(&records, start), args.top);
    if analytics.is_empty() {
        info!(%start, parsed = records.len(), "no requests inside the timeframe");
    }
    let report = Report::build(&analytics, start, now, records.len(), args.top);

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "{}\n", report.timeframe_line())?;
            report.write_text(&mut out)?;
        }
        OutputFormat::Json => write_json(&mut out, &report)?,
    }
    out.flush()?;
    Ok(())
}

fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Takes the domain and timeframe from the flags, asking for whatever is missing.
fn collect_inputs(
    domain: Option<String>,
    timeframe: Option<Timeframe>,
) -> Result<(String, Timeframe), AppError> {
    let console = Console::stderr();
    let domain = match domain {
        Some(domain) => {
            check_domain(&domain)?;
            domain.trim().to_owned()
        }
        None => console.domain()?,
    };
    let timeframe = match timeframe {
        Some(timeframe) => timeframe,
        None => console.timeframe()?,
    };
    Ok((domain, timeframe))
}
