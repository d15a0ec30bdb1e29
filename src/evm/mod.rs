//! VM adapters that run state tests and stream their traces

pub mod geth;

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::stream::TraceSession;

pub use geth::GethEvm;

/// A VM implementation that can run a state test in trace mode.
#[async_trait]
pub trait Evm: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Launch a state test and stream its instruction trace.
    ///
    /// Fails without leaving a process or task behind if the VM cannot be
    /// started.
    async fn start_state_test(&self, input: &Path) -> Result<TraceSession>;
}
