//! # evmtrace
//!
//! Stream instruction-level execution traces out of an external EVM while
//! it runs a state test.
//!
//! ## Usage
//!
//! ```no_run
//! use evmtrace::{Evm, GethEvm};
//! use std::path::Path;
//!
//! # async fn run() -> evmtrace::Result<()> {
//! let evm = GethEvm::new("/usr/local/bin/evm");
//! let mut session = evm.start_state_test(Path::new("add11.json")).await?;
//! while let Some(step) = session.recv().await {
//!     println!("{} {:?} gas={}", step.pc, step.mnemonic(), step.gas);
//! }
//! let summary = session.shutdown().await?;
//! println!("{} steps", summary.delivered);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `trace` - Trace record model and per-line classification
//! - `stream` - Background feed, delivery channel, and session lifecycle
//! - `evm` - VM adapters (go-ethereum `evm`)
//! - `subprocess` - Launching the VM with its diagnostic stream attached
//! - `config` - Adapter configuration
pub mod config;
pub mod error;
pub mod evm;
pub mod stream;
pub mod subprocess;
pub mod trace;


pub use config::TraceConfig;
pub use error::{Result, TraceError};
pub use evm::{Evm, GethEvm};
pub use stream::{
    spawn_feed, FeedSummary, LoggingObserver, SessionHandle, SessionState, TraceObserver,
    TraceSession,
};
pub use trace::{classify, DecodeErrorKind, DecodeFailure, LineClass, Opcode, TraceRecord};
