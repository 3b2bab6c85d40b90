use std::io;

use thiserror::Error;
use tokio::task::JoinError;

use crate::{discover::DiscoveryError, timeframe::SelectionError, worker::IngestError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("prompt failed: {0} (pass --domain and --minutes or --since when not on a terminal)")]
    Prompt(#[from] dialoguer::Error),
    #[error("input collection stopped: {0}")]
    Input(#[from] JoinError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("writing output failed: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}
