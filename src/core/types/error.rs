use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to read bug export: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to extract replay log: {0}")]
    Extract(#[from] ExtractError),
    #[error("Expected {} to be a directory, but it is not", .0.display())]
    NotADirectory(PathBuf),
}

pub type AppResult<T> = Result<T, AppError>;

/// Markers missing from a stderr capture that should contain a replayable SQL log
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not find last statement in stderr")]
    MissingLastStatement,
    #[error("could not find first statement in stderr")]
    MissingFirstStatement,
}
