//! The producer loop: read, classify, deliver

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, watch};

use super::observer::TraceObserver;
use super::session::SessionState;
use crate::subprocess::ExitStatus;
use crate::trace::{classify, LineClass, TraceRecord};

/// Per-session accounting, returned when the session is shut down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Records handed to the consumer
    pub delivered: u64,
    /// Depth-0 lines that were skipped
    pub noise: u64,
    /// Lines that failed to decode
    pub malformed: u64,
    /// Instructions read after the consumer went away
    pub undelivered: u64,
    /// Read error that ended the stream early, if any
    pub stream_error: Option<String>,
    /// Exit status of the producing process, when there is one
    pub exit_status: Option<ExitStatus>,
}

impl FeedSummary {
    /// Total lines read from the stream
    pub fn lines(&self) -> u64 {
        self.delivered + self.noise + self.malformed + self.undelivered
    }
}

/// Read `input` to the end, delivering instructions in order on `sender`.
///
/// The sender is dropped before this returns, which closes the channel.
/// If the receiver goes away the stream is still read to the end so the
/// producer never stalls on a full pipe.
pub(crate) async fn feed<R>(
    input: R,
    sender: mpsc::Sender<TraceRecord>,
    observer: &dyn TraceObserver,
    state: &watch::Sender<SessionState>,
) -> FeedSummary
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(input);
    let mut sender = Some(sender);
    let mut summary = FeedSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                summary.stream_error = Some(e.to_string());
                if let Err(err) = observer.on_stream_error(&e).await {
                    tracing::warn!("Observer failed to handle stream error: {}", err);
                }
                break;
            }
        }

        let line = trim_line_ending(&buf);
        match classify(line) {
            LineClass::Instruction(record) => {
                deliver(&mut sender, record, &mut summary).await;
            }
            LineClass::Noise(record) => {
                summary.noise += 1;
                if let Err(e) = observer.on_noise(line, &record).await {
                    tracing::warn!("Observer failed to handle noise line: {}", e);
                }
            }
            LineClass::DecodeError(failure) => {
                summary.malformed += 1;
                if let Err(e) = observer.on_decode_error(line, &failure).await {
                    tracing::warn!("Observer failed to handle malformed line: {}", e);
                }
            }
        }
    }

    state.send_replace(SessionState::Draining);
    drop(sender);
    tracing::trace!(lines = summary.lines(), "Trace feed reached end of stream");

    summary
}

async fn deliver(
    sender: &mut Option<mpsc::Sender<TraceRecord>>,
    record: TraceRecord,
    summary: &mut FeedSummary,
) {
    let Some(tx) = sender.as_ref() else {
        summary.undelivered += 1;
        return;
    };

    if tx.send(record).await.is_ok() {
        summary.delivered += 1;
    } else {
        tracing::debug!("Trace consumer dropped; draining remaining output without delivery");
        *sender = None;
        summary.undelivered += 1;
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
