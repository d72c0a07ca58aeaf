//! FFprobe adapter for media metadata queries

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::ProcessOutcome;
use crate::error::{CutError, CutResult};
use crate::ports::ProbePort;

/// Runs `ffprobe` as a child process, one query per call
pub struct FfprobeAdapter {
    path: PathBuf,
    timeout: Duration,
}

impl FfprobeAdapter {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    fn program_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn query(&self, args: &[String]) -> CutResult<String> {
        let program = self.program_name();
        debug!(command = %program, ?args, "Running probe");

        let child = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CutError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the wait future on expiry drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(CutError::Timeout {
                    program,
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        let outcome = ProcessOutcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !outcome.success() {
            return Err(CutError::ProcessFailure {
                program,
                code: outcome.code,
                output: outcome.tail(5),
            });
        }

        Ok(outcome.stdout.trim().to_string())
    }
}
