/// Error types for the engine.
///
/// Per-entry scan failures never appear here: they are absorbed where they
/// happen. Only failures attached to a whole call or a whole target surface.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a survey call.
#[derive(Error, Debug)]
pub enum SurveyError {
    /// The survey root could not be stat'd.
    #[error("cannot access {}: {source}", path.display())]
    NotAccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The caller's cancel flag was raised mid-survey.
    #[error("survey cancelled")]
    Cancelled,

    #[error("failed to build survey worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// The bounded deletion routine exhausted its attempts.
#[derive(Error, Debug)]
#[error("failed to delete {} after {attempts} attempt(s): {source}", path.display())]
pub struct DeleteError {
    pub path: PathBuf,
    pub attempts: u32,
    #[source]
    pub source: io::Error,
}

/// Failure of the best-effort directory cleaner.
#[derive(Error, Debug)]
pub enum CleanError {
    /// The top-level directory listing failed, so nothing was attempted.
    #[error("cannot list {}: {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory is a symlink; its target lies outside the location.
    #[error("refusing to clean through symlink {}", path.display())]
    Symlink { path: PathBuf },
}

/// Failure loading or saving configuration and whitelist files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a maintenance task action.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("{0}")]
    Other(String),
}

/// Failure writing a CSV report.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
