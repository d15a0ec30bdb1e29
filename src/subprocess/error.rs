#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture {stream} of '{command}'")]
    PipeUnavailable { command: String, stream: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessError {
    /// True when the error happened before the child was running.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            ProcessError::CommandNotFound(_)
                | ProcessError::SpawnFailed { .. }
                | ProcessError::PipeUnavailable { .. }
        )
    }
}
