//! Session lifecycle: one producer task, one delivery channel, join-only shutdown

use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::process::Child;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

use super::feed::{feed, FeedSummary};
use super::observer::TraceObserver;
use crate::error::Result;
use crate::subprocess::TokioProcessRunner;
use crate::trace::TraceRecord;

/// Lifecycle of a session, from the moment it is started. Transitions only
/// move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    /// Producer active, channel open
    Running,
    /// End of stream seen, channel being closed
    Draining,
    /// Channel closed and producer finished
    Closed,
}

/// Join side of a session.
///
/// There is no way to stop the producer early: shutdown waits until the
/// producing stream has been read to its end.
#[derive(Debug)]
pub struct SessionHandle {
    producer: JoinHandle<FeedSummary>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribe to state transitions; outlives the handle.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.producer.is_finished()
    }

    /// Wait for the producer to finish. Consumes the handle, so it runs once.
    pub async fn shutdown(self) -> Result<FeedSummary> {
        let summary = self.producer.await?;
        Ok(summary)
    }
}

/// A running trace stream and the handle needed to join it
#[derive(Debug)]
pub struct TraceSession {
    records: mpsc::Receiver<TraceRecord>,
    handle: SessionHandle,
}

impl TraceSession {
    /// Next instruction in output order, or `None` once the stream is exhausted.
    pub async fn recv(&mut self) -> Option<TraceRecord> {
        self.records.recv().await
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    /// Separate the delivery channel from the join handle.
    pub fn split(self) -> (mpsc::Receiver<TraceRecord>, SessionHandle) {
        (self.records, self.handle)
    }

    pub fn into_stream(self) -> (ReceiverStream<TraceRecord>, SessionHandle) {
        (ReceiverStream::new(self.records), self.handle)
    }

    /// Receive every remaining record, then join the producer.
    pub async fn drain(mut self) -> Result<(Vec<TraceRecord>, FeedSummary)> {
        let mut records = Vec::new();
        while let Some(record) = self.records.recv().await {
            records.push(record);
        }
        let summary = self.handle.shutdown().await?;
        Ok((records, summary))
    }

    /// Stop receiving and wait for the producer to finish.
    ///
    /// Records still queued are dropped; the producer keeps reading its
    /// input to the end without delivering.
    pub async fn shutdown(self) -> Result<FeedSummary> {
        let (records, handle) = self.split();
        drop(records);
        handle.shutdown().await
    }
}

/// Start a session over any byte stream.
pub fn spawn_feed<R>(
    input: R,
    capacity: usize,
    observer: Arc<dyn TraceObserver>,
) -> TraceSession
where
    R: AsyncRead + Unpin + Send + 'static,
{
    spawn_producer(input, None, capacity, observer)
}

/// Start a session over a child's output, reaping the child once the
/// stream is exhausted.
pub(crate) fn spawn_process_feed<R>(
    input: R,
    child: Child,
    capacity: usize,
    observer: Arc<dyn TraceObserver>,
) -> TraceSession
where
    R: AsyncRead + Unpin + Send + 'static,
{
    spawn_producer(input, Some(child), capacity, observer)
}

fn spawn_producer<R>(
    input: R,
    child: Option<Child>,
    capacity: usize,
    observer: Arc<dyn TraceObserver>,
) -> TraceSession
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (sender, records) = mpsc::channel(capacity.max(1));
    let (state_tx, state) = watch::channel(SessionState::Running);
    let producer = tokio::spawn(async move {
        let mut summary = feed(input, sender, observer.as_ref(), &state_tx).await;

        if let Some(mut child) = child {
            match TokioProcessRunner::reap(&mut child).await {
                Ok(status) => summary.exit_status = Some(status),
                Err(e) => tracing::warn!("Failed to reap trace process: {}", e),
            }
        }

        state_tx.send_replace(SessionState::Closed);
        if let Err(e) = observer.on_complete(&summary).await {
            tracing::warn!("Observer failed to handle completion: {}", e);
        }
        summary
    });

    TraceSession {
        records,
        handle: SessionHandle { producer, state },
    }
}
