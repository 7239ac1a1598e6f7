//! Error types for LogTriage core.

use std::{error::Error, fmt, io};

/// Error type for LogTriage core operations.
#[derive(Debug)]
pub enum LogTriageError {
    /// An underlying I/O error.
    Io(io::Error),
    /// The backend could not be reached (network, DNS, TLS, or CORS failure).
    Transport(String),
    /// A response body could not be decoded as the expected JSON shape.
    Parse(serde_json::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for LogTriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Transport(message) => write!(f, "{message}"),
            Self::Parse(err) => write!(f, "invalid response body: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for LogTriageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Transport(_) | Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for LogTriageError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LogTriageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Convenience result type for LogTriage core.
pub type Result<T> = std::result::Result<T, LogTriageError>;
