use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use chrono::{DateTime, Local, TimeDelta};
use flate2::{Compression, write::GzEncoder};
use rand::Rng;

use crate::{args::CliArgs, generator::generate_domlog_line};

/// `<domain>` for the live file, `<domain>-<n>[.gz]` for rotations.
fn file_name(domain: &str, index: usize, gzip: bool) -> String {
    match (index, gzip) {
        (0, _) => domain.to_string(),
        (n, false) => format!("{domain}-{n}"),
        (n, true) => format!("{domain}-{n}.gz"),
    }
}

/// Start of the file `age` spans back from `now`, if the calendar reaches that far.
fn rotation_start(now: DateTime<Local>, span: TimeDelta, age: usize) -> Option<DateTime<Local>> {
    let back = span.checked_mul(i32::try_from(age).ok()?)?;
    now.checked_sub_signed(back)
}

fn out_of_range(args: &CliArgs) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!(
            "{} files of {} hours reach past the representable date range",
            args.files(),
            args.hours()
        ),
    )
}

fn write_lines<W: Write, R: Rng + ?Sized>(
    out: &mut W,
    rng: &mut R,
    lines: usize,
    from: DateTime<Local>,
    span: TimeDelta,
) -> io::Result<()> {
    let step = span.num_seconds() / i64::try_from(lines.max(1)).unwrap_or(i64::MAX);
    for i in 0..lines {
        let offset = i64::try_from(i).unwrap_or(i64::MAX).saturating_mul(step);
        let at = from + TimeDelta::seconds(offset);
        writeln!(out, "{}", generate_domlog_line(rng, at))?;
    }
    Ok(())
}

/// Writes `files` domlogs into `dir`, newest first, each covering `hours`
/// of traffic in chronological order. Returns the paths written.
pub fn write_log_files<R: Rng + ?Sized>(
    args: &CliArgs,
    rng: &mut R,
    now: DateTime<Local>,
) -> io::Result<Vec<PathBuf>> {
    let span = TimeDelta::try_hours(i64::from(*args.hours())).ok_or_else(|| out_of_range(args))?;
    rotation_start(now, span, *args.files()).ok_or_else(|| out_of_range(args))?;
    fs::create_dir_all(args.dir())?;
    let mut written = Vec::with_capacity(*args.files());

    for index in 0..*args.files() {
        let path = args.dir().join(file_name(args.domain(), index, *args.gzip()));
        let from = rotation_start(now, span, index + 1).ok_or_else(|| out_of_range(args))?;
        let file = BufWriter::new(File::create(&path)?);

        if index > 0 && *args.gzip() {
            let mut encoder = GzEncoder::new(file, Compression::default());
            write_lines(&mut encoder, rng, *args.lines(), from, span)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            write_lines(&mut file, rng, *args.lines(), from, span)?;
            file.flush()?;
        }
        written.push(path);
    }
    Ok(written)
}
