//! FFmpeg adapter for running conversions
//!
//! Spawns the encoder without a shell, drains stdout and stderr in two
//! reader tasks and feeds both to the progress monitor.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::model::ProcessOutcome;
use crate::engine::command::CommandLine;
use crate::engine::monitor::{read_cr_lines, ProgressMonitor, StreamKind};
use crate::engine::progress::ProgressSink;
use crate::error::{CutError, CutResult};
use crate::ports::EncoderPort;

/// Bounded so a stalled monitor applies backpressure to the readers
const LINE_BUFFER: usize = 256;

/// Process-backed encoder port
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegAdapter;

impl FfmpegAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EncoderPort for FfmpegAdapter {
    async fn run(
        &self,
        command: &CommandLine,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> CutResult<ProcessOutcome> {
        if cancel.is_cancelled() {
            return Err(CutError::Cancelled);
        }

        let program = command.program_name();
        info!(command = %command, "Running encoder");

        let mut child = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CutError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(read_cr_lines(stdout, StreamKind::Stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(read_cr_lines(stderr, StreamKind::Stderr, tx.clone())));
        }
        drop(tx);

        let captured = match ProgressMonitor::consume(rx, sink, cancel).await {
            Ok(captured) => captured,
            Err(e) => {
                warn!(command = %program, "Stopping encoder: {}", e);
                let _ = child.kill().await;
                for reader in readers {
                    reader.abort();
                }
                return Err(e);
            }
        };

        for reader in readers {
            match reader.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(command = %program, "Output read failed: {}", e),
                Err(e) => warn!(command = %program, "Output reader task failed: {}", e),
            }
        }

        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            status = child.wait() => Some(status?),
        };
        let Some(status) = status else {
            let _ = child.kill().await;
            return Err(CutError::Cancelled);
        };

        info!(command = %program, code = ?status.code(), "Encoder finished");
        Ok(ProcessOutcome {
            code: status.code(),
            stdout: captured.stdout,
            stderr: captured.stderr,
        })
    }
}
