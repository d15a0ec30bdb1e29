//! Streaming trace adapter
//!
//! A single background task reads a producer's output line by line,
//! classifies each line, and forwards instructions in order over a bounded
//! channel. Backpressure from the consumer is the only flow control. The
//! channel closes exactly once, after the input is exhausted, and
//! [`SessionHandle::shutdown`] joins the task.

pub mod feed;
pub mod observer;
pub mod session;


pub use feed::FeedSummary;
pub use observer::{LoggingObserver, TraceObserver};
pub use session::{spawn_feed, SessionHandle, SessionState, TraceSession};
