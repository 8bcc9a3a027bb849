//! Error type shared by every fallible operation of the client core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No backend URL was configured (see `ClientConfig`).
    #[error("Backend not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with `ok` unset or false.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The backend answered with something that is not the expected JSON envelope.
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No history entry for {0}")]
    UnknownEntry(String),

    #[error("No line {index} in {entry}")]
    NoSuchLine { entry: String, index: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the remote store (as opposed to local export/IO problems).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::NotConfigured | Error::Transport(_) | Error::Rejected(_) | Error::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
