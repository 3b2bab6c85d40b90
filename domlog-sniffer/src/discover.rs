use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, PatternError, glob};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid log file pattern `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: PatternError,
    },
}

/// Finds the domlogs of `domain` in `log_dir` and any directory below it.
///
/// Matches every regular file whose name starts with `domain`, so rotated
/// and compressed copies are picked up too. `domain` may itself contain glob
/// wildcards; `log_dir` is taken literally. Returns sorted, unique paths.
pub fn discover(log_dir: &Path, domain: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    let root = Pattern::escape(&log_dir.to_string_lossy());
    let mut found = BTreeSet::new();

    for pattern in [format!("{root}/{domain}*"), format!("{root}/**/{domain}*")] {
        let matches = glob(&pattern).map_err(|source| DiscoveryError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        found.extend(matches.filter_map(Result::ok).filter(|p| p.is_file()));
    }

    debug!(log_dir = %log_dir.display(), domain, files = found.len(), "discovered log files");
    Ok(found.into_iter().collect())
}
