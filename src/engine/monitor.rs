//! Encoder output monitoring
//!
//! The encoder rewrites its status line with carriage returns, so output is
//! cut into chunks at `\r` rather than `\n`. Both pipes are drained by
//! their own reader task into one channel, which the monitor consumes.

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::engine::progress::ProgressSink;
use crate::error::{CutError, CutResult};

/// Frame counter in the encoder's status line
static FRAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"frame=\s*(\d+)\s").unwrap());

/// First frame number in `line`, if any
pub fn parse_frame(line: &str) -> Option<u64> {
    FRAME_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// One carriage-return delimited chunk of process output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
}

/// Forward `reader` to `tx` one `\r`-terminated chunk at a time.
///
/// Stops quietly when the receiving side is gone.
pub async fn read_cr_lines<R>(
    reader: R,
    stream: StreamKind,
    tx: mpsc::Sender<OutputLine>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\r', &mut buf).await? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        let text = String::from_utf8_lossy(&buf).into_owned();
        if tx.send(OutputLine { stream, text }).await.is_err() {
            return Ok(());
        }
    }
}

/// Full output of a finished process, per stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    fn push(&mut self, line: OutputLine) {
        let target = match line.stream {
            StreamKind::Stdout => &mut self.stdout,
            StreamKind::Stderr => &mut self.stderr,
        };
        target.push_str(&line.text);
        target.push('\n');
    }
}

/// Turns merged encoder output into progress updates
pub struct ProgressMonitor;

impl ProgressMonitor {
    /// Drain `rx` until every sender is dropped, reporting frames to `sink`.
    ///
    /// Cancellation wins over pending output and fails with `Cancelled`.
    pub async fn consume(
        mut rx: mpsc::Receiver<OutputLine>,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> CutResult<CapturedOutput> {
        let mut captured = CapturedOutput::default();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CutError::Cancelled),
                line = rx.recv() => match line {
                    Some(line) => {
                        match parse_frame(&line.text) {
                            Some(frame) => sink.set_current_frame(frame),
                            None => trace!(line = %line.text, "No frame counter"),
                        }
                        captured.push(line);
                    }
                    None => return Ok(captured),
                },
            }
        }
    }
}
