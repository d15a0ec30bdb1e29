//! Diagnostics sink for lines the feed does not deliver

use anyhow::Result;
use async_trait::async_trait;

use super::feed::FeedSummary;
use crate::trace::{DecodeFailure, TraceRecord};

/// Receives everything the feed loop filters out.
///
/// Errors returned from an observer are logged and never stop the feed.
#[async_trait]
pub trait TraceObserver: Send + Sync {
    /// A line decoded cleanly but is not an instruction
    async fn on_noise(&self, raw: &[u8], record: &TraceRecord) -> Result<()>;

    /// A line could not be decoded
    async fn on_decode_error(&self, raw: &[u8], failure: &DecodeFailure) -> Result<()>;

    /// Reading the output stream failed; the feed ends after this call
    async fn on_stream_error(&self, error: &std::io::Error) -> Result<()>;

    /// The feed has closed the delivery channel and the producer is done
    async fn on_complete(&self, summary: &FeedSummary) -> Result<()>;
}

/// Default observer that reports through `tracing`
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new("trace")
    }
}

#[async_trait]
impl TraceObserver for LoggingObserver {
    async fn on_noise(&self, raw: &[u8], _record: &TraceRecord) -> Result<()> {
        tracing::debug!("{} non-op line: {}", self.prefix, String::from_utf8_lossy(raw));
        Ok(())
    }

    async fn on_decode_error(&self, raw: &[u8], failure: &DecodeFailure) -> Result<()> {
        tracing::warn!(
            kind = %failure.kind,
            "{} err: {}, line: {}",
            self.prefix,
            failure.message,
            String::from_utf8_lossy(raw)
        );
        Ok(())
    }

    async fn on_stream_error(&self, error: &std::io::Error) -> Result<()> {
        tracing::error!("{} output stream failed: {}", self.prefix, error);
        Ok(())
    }

    async fn on_complete(&self, summary: &FeedSummary) -> Result<()> {
        tracing::debug!(
            delivered = summary.delivered,
            noise = summary.noise,
            malformed = summary.malformed,
            undelivered = summary.undelivered,
            "{} completed with exit status: {:?}",
            self.prefix,
            summary.exit_status
        );
        Ok(())
    }
}
