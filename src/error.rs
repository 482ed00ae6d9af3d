use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NexError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("launcher data in {path:?} is corrupt: {reason}")]
    DataCorrupt { path: PathBuf, reason: String },

    #[error("{0}")]
    Validation(String),
}

impl NexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NexError::Io { path: path.into(), source }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        NexError::Validation(msg.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("nothing to launch: target is empty")]
    Empty,

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("'{0}' does not exist")]
    NotFound(String),

    #[error("cannot open '{target}': {reason}")]
    Unsupported { target: String, reason: String },
}

pub type Result<T> = std::result::Result<T, NexError>;
