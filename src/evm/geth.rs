//! Adapter around the go-ethereum `evm` binary

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Evm;
use crate::config::TraceConfig;
use crate::error::Result;
use crate::stream::session::spawn_process_feed;
use crate::stream::{LoggingObserver, TraceObserver, TraceSession};
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder, TokioProcessRunner};

/// Flags preceding the input path. The order is fixed by the binary.
pub const STATE_TEST_FLAGS: [&str; 3] = ["--json", "--nomemory", "statetest"];

/// Runs `evm --json --nomemory statetest <input>` and streams stderr.
pub struct GethEvm {
    path: PathBuf,
    name: String,
    channel_capacity: usize,
    observer: Arc<dyn TraceObserver>,
}

impl GethEvm {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::from_config(&TraceConfig::new(path))
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self {
            path: config.binary.clone(),
            name: config.name.clone(),
            channel_capacity: config.channel_capacity.max(1),
            observer: Arc::new(LoggingObserver::new(config.name.clone())),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TraceObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The exact command spawned for `input`
    pub fn state_test_command(&self, input: &Path) -> ProcessCommand {
        ProcessCommandBuilder::new(&self.path)
            .args(STATE_TEST_FLAGS)
            .arg(input)
            .build()
    }
}

#[async_trait]
impl Evm for GethEvm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start_state_test(&self, input: &Path) -> Result<TraceSession> {
        let command = self.state_test_command(input);
        let process = TokioProcessRunner::spawn_stderr(&command).await?;

        tracing::debug!(
            "{} streaming state test {} (capacity {})",
            self.name,
            input.display(),
            self.channel_capacity
        );

        Ok(spawn_process_feed(
            process.stderr,
            process.child,
            self.channel_capacity,
            Arc::clone(&self.observer),
        ))
    }
}
