use std::path::PathBuf;

use clap::Parser;
use derive_getters::Getters;

#[derive(Parser, Debug, Getters)]
#[command(name = "domlog-faker")]
#[command(about = "Generate fake Apache domlogs for testing", long_about = None)]
pub struct CliArgs {
    /// Directory the log files are written to
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    #[arg(long, default_value = "example.com")]
    domain: String,

    /// Number of files; every file after the first is an older rotation
    #[arg(long, default_value_t = 3)]
    files: usize,

    /// Lines per file
    #[arg(long, default_value_t = 10_000)]
    lines: usize,

    /// Hours of traffic covered by each file
    #[arg(long, default_value_t = 24)]
    hours: u32,

    /// Gzip the rotated files
    #[arg(long)]
    gzip: bool,

    #[arg(long)]
    seed: Option<u64>,
}
