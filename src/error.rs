use thiserror::Error;

use crate::subprocess::ProcessError;

#[derive(Error, Debug)]
pub enum TraceError {
    /// The trace producer could not be launched; no session exists.
    #[error("Failed to start trace session: {0}")]
    Startup(#[from] ProcessError),

    /// The background producer ended abnormally (panic or runtime shutdown).
    #[error("Trace producer task failed: {0}")]
    Producer(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TraceError>;
