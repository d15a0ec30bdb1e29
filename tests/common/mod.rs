//! Common test utilities: fake VM binaries and state-test inputs

#![allow(dead_code)]

use anyhow::Result;
use evmtrace::{Evm, GethEvm, TraceError, TraceSession};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Script body that checks the argument shape and replays the input file on stderr
pub const REPLAY_INPUT: &str = r#"
if [ "$#" -ne 4 ] || [ "$1" != "--json" ] || [ "$2" != "--nomemory" ] || [ "$3" != "statetest" ]; then
    echo "unexpected arguments: $*" >&2
    exit 64
fi
echo "stdout is not traced"
cat "$4" >&2
"#;

/// Install a test subscriber; repeated calls are ignored
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("evmtrace=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Temporary directory holding a fake `evm` and its inputs
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self> {
        init_tracing();
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write an executable shell script named `name`
    pub fn fake_evm(&self, name: &str, body: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.temp_dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}", body))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Write a state-test input whose content is the given trace lines
    pub fn trace_input(&self, name: &str, lines: &[&str]) -> Result<PathBuf> {
        let mut content = lines.join("\n");
        if !lines.is_empty() {
            content.push('\n');
        }
        self.create_file(name, &content)
    }

    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Start a state test, retrying while a freshly written script is still
/// reported busy by the kernel.
pub async fn start_with_retry(evm: &GethEvm, input: &Path) -> Result<TraceSession, TraceError> {
    let mut attempts = 0;
    loop {
        match evm.start_state_test(input).await {
            Err(TraceError::Startup(evmtrace::subprocess::ProcessError::SpawnFailed {
                source,
                ..
            })) if source.raw_os_error() == Some(26) && attempts < 20 => {
                attempts += 1;
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            result => return result,
        }
    }
}
