use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, ChildStderr};

use super::error::ProcessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    /// Render the command line for diagnostics
    pub fn display(&self) -> String {
        let mut rendered = self.program.display().to_string();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }

    fn from_std(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::from_signal(status)
        }
    }

    #[cfg(unix)]
    fn from_signal(status: std::process::ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;
        match status.signal() {
            Some(signal) => ExitStatus::Signal(signal),
            None => ExitStatus::Error(1),
        }
    }

    #[cfg(not(unix))]
    fn from_signal(_status: std::process::ExitStatus) -> Self {
        ExitStatus::Error(1)
    }
}

/// A running child whose stderr has been detached for streaming.
#[derive(Debug)]
pub struct StderrProcess {
    pub child: Child,
    pub stderr: ChildStderr,
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Spawn `command` with stdin and stdout discarded and stderr piped.
    ///
    /// The pipe is configured before the process starts so no early output
    /// is lost. If the pipe cannot be taken after spawning, the child is
    /// killed and reaped before the error is returned.
    pub async fn spawn_stderr(command: &ProcessCommand) -> Result<StderrProcess, ProcessError> {
        Self::log_command_start(command);

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, command))?;

        match child.stderr.take() {
            Some(stderr) => {
                tracing::debug!(pid = ?child.id(), "Spawned {}", command.display());
                Ok(StderrProcess { child, stderr })
            }
            None => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill '{}' after pipe loss: {}", command.display(), e);
                }
                Err(ProcessError::PipeUnavailable {
                    command: command.display(),
                    stream: "stderr".to_string(),
                })
            }
        }
    }

    /// Wait for the child to exit and reap it.
    pub async fn reap(child: &mut Child) -> Result<ExitStatus, ProcessError> {
        let status = child.wait().await?;
        Ok(ExitStatus::from_std(status))
    }

    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        tracing::error!(
            "Failed to spawn '{}': {:?} (kind: {:?})",
            command.program.display(),
            error,
            error.kind()
        );

        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(command.program.display().to_string())
        } else {
            ProcessError::SpawnFailed {
                command: command.display(),
                source: error,
            }
        }
    }
}
