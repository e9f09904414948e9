//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use weft_edit::{CoordinatorError, SaveError};

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read workspace edit {path}: {source}")]
    ReadEdit { path: PathBuf, source: io::Error },
    #[error("failed to parse workspace edit {path}: {source}")]
    ParseEdit {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
    #[error("failed to save edited documents: {0}")]
    Save(#[from] SaveError),
    #[error("failed to serialise outcome: {0}")]
    SerialiseOutcome(serde_json::Error),
    #[error("failed to write outcome: {0}")]
    WriteOutcome(io::Error),
}
