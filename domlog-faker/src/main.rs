mod args;
mod generator;
mod stream;

use std::process::ExitCode;

use args::CliArgs;
use chrono::Local;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use stream::write_log_files;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut rng = match args.seed() {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Writing {} log files of {} lines for {} into {}",
        args.files(),
        args.lines(),
        args.domain(),
        args.dir().display()
    );
    match write_log_files(&args, &mut rng, Local::now()) {
        Ok(paths) => {
            for path in paths {
                println!(" - {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to write logs: {e}");
            ExitCode::FAILURE
        }
    }
}
