use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use flate2::read::MultiGzDecoder;
use tracing::warn;

const GZIP_SUFFIX: &str = ".gz";

/// Reads every line of a domlog, decompressing `.gz` files on the fly.
///
/// Invalid UTF-8 is replaced rather than rejected. A file that cannot be
/// opened or read to the end yields no lines at all.
pub fn read_lines(path: &Path) -> Vec<String> {
    match try_read_lines(path) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable log file");
            Vec::new()
        }
    }
}

fn try_read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    if is_compressed(path) {
        collect_lines(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        collect_lines(BufReader::new(file))
    }
}

fn is_compressed(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(GZIP_SUFFIX)
}

// `\n`, `\r\n` and a lone `\r` all end a line.
fn collect_lines<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while reader.read_until(b'\n', &mut buf)? > 0 {
        let chunk = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        let chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
        lines.extend(
            chunk
                .split(|&b| b == b'\r')
                .map(|line| String::from_utf8_lossy(line).into_owned()),
        );
        buf.clear();
    }
    Ok(lines)
}
