//! Per-line classification of VM diagnostic output

use serde_json::error::Category;
use std::fmt;

use super::record::TraceRecord;

/// Outcome of classifying one line of VM output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// An executed instruction that must be delivered
    Instruction(TraceRecord),
    /// Decoded, but not an instruction (run summary, state root, blank object)
    Noise(TraceRecord),
    /// The line could not be decoded as a trace record
    DecodeError(DecodeFailure),
}

/// Why a line failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not JSON at all
    Syntax,
    /// JSON that ended early, including empty lines
    Truncated,
    /// Well-formed JSON of the wrong shape
    Shape,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecodeErrorKind::Syntax => "syntax",
            DecodeErrorKind::Truncated => "truncated",
            DecodeErrorKind::Shape => "shape",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub kind: DecodeErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for DecodeFailure {}

impl From<serde_json::Error> for DecodeFailure {
    fn from(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            Category::Eof => DecodeErrorKind::Truncated,
            Category::Data => DecodeErrorKind::Shape,
            Category::Syntax | Category::Io => DecodeErrorKind::Syntax,
        };
        Self {
            kind,
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Classify one line of output.
///
/// Decoding and the depth rule are separate steps: a line that decodes
/// cleanly is still noise when its depth is 0.
pub fn classify(line: &[u8]) -> LineClass {
    match serde_json::from_slice::<TraceRecord>(line) {
        Err(err) => LineClass::DecodeError(DecodeFailure::from(err)),
        Ok(record) if record.is_instruction() => LineClass::Instruction(record),
        Ok(record) => LineClass::Noise(record),
    }
}
