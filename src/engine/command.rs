//! Encoder invocation builder
//!
//! Commands are kept as ordered argument tokens and passed to the OS
//! without a shell, so paths with spaces or quotes need no escaping. The
//! token order follows the encoder's positional rules: flags before `-i`
//! apply to the input, flags after it to the output.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::model::{format_span, AudioDecision, JobRequest};
use crate::domain::options::OptionTables;
use crate::error::CutResult;
use crate::utils::path::shell_quote;

/// A program plus its argument tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Append a flag fragment such as `-c:a aac -b:a 192k`, split on whitespace
    pub fn fragment(&mut self, fragment: &str) -> &mut Self {
        self.args(fragment.split_whitespace())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Short program name for log and error messages
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

impl fmt::Display for CommandLine {
    /// Shell-quoted rendering, for logs only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// The trim window shared by every file of a job, split around `-i <input>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPrefix {
    before_input: Vec<String>,
    after_input: Vec<String>,
}

impl StaticPrefix {
    /// Build the seek and duration flags for a job.
    ///
    /// The coarse seek to whole seconds goes before the input, where it is
    /// fast; the sub-second remainder is applied after decoding. The stop
    /// argument is measured from that whole-second seek point. Zero start
    /// omits both seeks, zero end omits the stop and encodes to the end.
    pub fn build(job: &JobRequest) -> CutResult<Self> {
        let mut before_input = vec!["-sn".to_string()];
        let mut after_input = Vec::new();

        if let Some(rate) = job.input_framerate.as_deref().filter(|r| !r.trim().is_empty()) {
            before_input.push("-r".into());
            before_input.push(rate.trim().to_string());
        }

        let seek_point = job.start.whole_seconds();
        if !job.start.is_zero() {
            before_input.push("-ss".into());
            before_input.push(job.start.to_clock_whole());
            after_input.push("-ss".into());
            after_input.push(format!("0.{:03}", job.start.millis()));
        }

        if !job.end.is_zero() {
            let span = job.end.millis_since(&seek_point)?;
            after_input.push("-to".into());
            after_input.push(format_span(span));
        }

        debug!(?before_input, ?after_input, "Built static prefix");
        Ok(Self {
            before_input,
            after_input,
        })
    }

    /// Prefix tokens with `input` in place
    pub fn with_input(&self, input: &Path) -> Vec<String> {
        let mut tokens = self.before_input.clone();
        tokens.push("-i".into());
        tokens.push(input.to_string_lossy().into_owned());
        tokens.extend(self.after_input.iter().cloned());
        tokens
    }
}

/// Audio flags for one input: stream copy when the source already has the
/// requested codec, otherwise the target's entry in the option table
pub fn build_audio_fragment(
    tables: &OptionTables,
    source_codec: &str,
    target_codec: &str,
) -> CutResult<AudioDecision> {
    info!(selected = target_codec, input = source_codec, "Resolving audio codec");

    let fragment = if source_codec == target_codec {
        tables.copy_fragment()
    } else {
        tables.audio_fragment(target_codec)?
    };

    Ok(AudioDecision {
        source_codec: source_codec.to_string(),
        fragment: fragment.to_string(),
    })
}

/// Assemble the full invocation for one input.
///
/// `video_fragment` must already have its `<res>`/`<crf>` placeholders
/// resolved, see [`crate::domain::model::VideoOption::resolve_command`].
pub fn build_full_command(
    encoder: &Path,
    prefix: &StaticPrefix,
    audio: &AudioDecision,
    video_fragment: &str,
    input: &Path,
    output: &Path,
) -> CommandLine {
    let mut command = CommandLine::new(encoder);
    command
        .args(prefix.with_input(input))
        .fragment(&audio.fragment)
        .fragment(video_fragment)
        .arg(output.to_string_lossy().into_owned());
    command
}

/// Whether a planned output still needs to be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    Proceed,
    SkipExisting,
}

/// Check the output slot before anything is probed or spawned.
///
/// An existing output is skipped. With an empty video fragment the output is
/// a file pattern inside a directory of its own, and an existing directory
/// counts as done. Nothing is created here.
pub async fn check_output(output: &Path, video_fragment: &str) -> CutResult<OutputAction> {
    if tokio::fs::try_exists(output).await? {
        info!(output = %output.display(), "Already exists");
        return Ok(OutputAction::SkipExisting);
    }

    if let Some(directory) = frame_dir(output, video_fragment) {
        if tokio::fs::try_exists(directory).await? {
            info!(directory = %directory.display(), "Frame directory already exists");
            return Ok(OutputAction::SkipExisting);
        }
    }

    Ok(OutputAction::Proceed)
}

/// Create the frame directory of an extraction output, right before the
/// encoder runs. Returns the directory when this call created it.
pub async fn ensure_frame_dir(output: &Path, video_fragment: &str) -> CutResult<Option<PathBuf>> {
    let Some(directory) = frame_dir(output, video_fragment) else {
        return Ok(None);
    };
    if tokio::fs::try_exists(directory).await? {
        return Ok(None);
    }
    tokio::fs::create_dir(directory).await?;
    debug!(directory = %directory.display(), "Created frame directory");
    Ok(Some(directory.to_path_buf()))
}

/// Remove whatever a failed or cancelled encode left behind, so the next
/// run does not take it for a finished output
pub async fn discard_partial_output(output: &Path, created_dir: Option<&Path>) {
    let removal = match created_dir {
        Some(directory) => tokio::fs::remove_dir_all(directory).await,
        None => match tokio::fs::remove_file(output).await {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        },
    };
    match removal {
        Ok(()) => debug!(output = %output.display(), "Discarded partial output"),
        Err(e) => warn!(output = %output.display(), "Could not remove partial output: {}", e),
    }
}

fn frame_dir<'a>(output: &'a Path, video_fragment: &str) -> Option<&'a Path> {
    if video_fragment.trim().is_empty() {
        output.parent()
    } else {
        None
    }
}
