use std::{
    num::NonZero,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
    time::Instant,
};

use thiserror::Error;
use tokio::{
    sync::{AcquireError, Semaphore},
    task::{JoinError, JoinSet},
};
use tracing::{debug, info};

use crate::{ingest::read_lines, models::LogRecord, parser::parse_line};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("log worker failed: {0}")]
    Worker(#[from] JoinError),
    #[error("log worker pool closed: {0}")]
    PoolClosed(#[from] AcquireError),
}

/// One worker per available core, never fewer than one.
pub fn default_pool_size() -> NonZero<usize> {
    thread::available_parallelism().unwrap_or(NonZero::<usize>::MIN)
}

/// Reads and parses one file end to end, keeping line order.
pub fn process_file(path: &Path) -> Vec<LogRecord> {
    let records: Vec<_> = read_lines(path)
        .iter()
        .map(String::as_str)
        .filter_map(parse_line)
        .collect();
    debug!(path = %path.display(), records = records.len(), "parsed log file");
    records
}

/// Parses every file on a pool of at most `workers` blocking tasks.
///
/// Returns only after all files are done. Records are concatenated in the
/// order of `paths`, whatever order the workers finish in. Unreadable files
/// contribute nothing; only a crashed worker is reported as an error.
pub async fn ingest(paths: &[PathBuf], workers: NonZero<usize>) -> Result<Vec<LogRecord>, IngestError> {
    let started = Instant::now();
    let pool = Arc::new(Semaphore::new(workers.get()));
    let mut tasks = JoinSet::new();

    for (index, path) in paths.iter().cloned().enumerate() {
        let permit = pool.clone().acquire_owned().await?;
        tasks.spawn_blocking(move || {
            let records = process_file(&path);
            drop(permit);
            (index, records)
        });
    }

    let mut per_file = vec![Vec::new(); paths.len()];
    while let Some(done) = tasks.join_next().await {
        let (index, records) = done?;
        per_file[index] = records;
    }

    let records: Vec<_> = per_file.into_iter().flatten().collect();
    info!(
        files = paths.len(),
        workers = workers.get(),
        records = records.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "ingestion finished"
    );
    Ok(records)
}
