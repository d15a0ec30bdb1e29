//! Trace record model and line classification

pub mod classifier;
pub mod record;

pub use classifier::{classify, DecodeErrorKind, DecodeFailure, LineClass};
pub use record::{Opcode, TraceRecord};
