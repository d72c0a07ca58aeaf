// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::model::ProcessOutcome;
use crate::engine::command::CommandLine;
use crate::engine::progress::ProgressSink;
use crate::error::CutResult;

/// Port for read-only media metadata queries
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Run the probe tool with `args` and return its trimmed standard output
    async fn query(&self, args: &[String]) -> CutResult<String>;
}

/// Port for running the encoder
#[async_trait]
pub trait EncoderPort: Send + Sync {
    /// Run `command` to completion, reporting frame progress to `sink`.
    ///
    /// Returns the outcome whatever the exit status; callers decide what a
    /// non-zero exit means. Cancellation kills the process and fails with
    /// [`crate::error::CutError::Cancelled`].
    async fn run(
        &self,
        command: &CommandLine,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> CutResult<ProcessOutcome>;
}

/// Port for preparing an image sequence the encoder can read
#[async_trait]
pub trait StagingPort: Send + Sync {
    /// Re-encode `sources`, in the given order, as a numbered sequence in
    /// `target_dir`. Returns the number of staged frames.
    async fn stage_frames(&self, sources: Vec<PathBuf>, target_dir: &Path) -> CutResult<usize>;
}

/// Port for showing finished outputs to the user
pub trait RevealPort: Send + Sync {
    /// Fire and forget; failures are logged, never returned
    fn reveal(&self, directory: &Path);
}
