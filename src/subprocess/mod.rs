//! Process abstraction for launching trace producers
//!
//! Describes a command, builds it, and spawns it with only its diagnostic
//! stream attached.

pub mod builder;
pub mod error;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use runner::{ExitStatus, ProcessCommand, StderrProcess, TokioProcessRunner};
