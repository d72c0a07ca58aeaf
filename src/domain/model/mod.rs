// Domain models - Core types and data structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod time;

pub use time::{format_span, TimeSpec};

/// Token replaced by the scale value inside a video command fragment
pub const SCALE_PLACEHOLDER: &str = "<res>";
/// Token replaced by the quality value inside a video command fragment
pub const CRF_PLACEHOLDER: &str = "<crf>";
/// Token replaced by the input's extension inside an output suffix template
pub const EXT_PLACEHOLDER: &str = "%ext";

/// Selectable video conversion: encoder flags plus output suffix template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOption {
    /// Display name used on the command line
    #[serde(default)]
    pub name: String,
    /// Encoder flags; may contain `<res>` and `<crf>`; empty selects
    /// frame-extraction mode
    pub command: String,
    /// Appended to the output name; `%ext` keeps the input's extension
    pub suffix: String,
}

impl VideoOption {
    pub fn new(name: impl Into<String>, command: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            suffix: suffix.into(),
        }
    }

    /// Command fragment with scale and quality substituted
    pub fn resolve_command(&self, scale: &str, crf: &str) -> String {
        self.command
            .replace(SCALE_PLACEHOLDER, scale)
            .replace(CRF_PLACEHOLDER, crf)
    }

    /// Output suffix for an input with extension `ext` (dot included)
    pub fn resolve_suffix(&self, ext: &str) -> String {
        self.suffix.replace(EXT_PLACEHOLDER, ext)
    }
}

/// What to do with the rest of a job once one file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole job on the first failure
    #[default]
    FailFast,
    /// Record the failure and move on to the next file
    ContinueOnError,
}

/// Immutable description of one conversion run
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub start: TimeSpec,
    pub end: TimeSpec,
    /// Directory holding the inputs; outputs are written next to them
    pub working_dir: PathBuf,
    /// Input file names relative to `working_dir`, in the order given
    pub files: Vec<String>,
    pub video: VideoOption,
    /// Audio option name, also compared against the probed source codec
    pub audio_target: String,
    pub scale: String,
    pub crf: String,
    pub input_framerate: Option<String>,
    pub failure_policy: FailurePolicy,
}

/// Audio handling resolved for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDecision {
    /// Codec name reported by the probe, empty when there is no audio
    pub source_codec: String,
    /// Encoder flags for the audio stream
    pub fragment: String,
}

/// Exit status and captured output of one external invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last lines of the combined output, for error messages
    pub fn tail(&self, lines: usize) -> String {
        let combined = format!("{}\n{}", self.stdout, self.stderr);
        let kept: Vec<&str> = combined
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let from = kept.len().saturating_sub(lines);
        kept[from..].join("\n")
    }
}

/// Stage of a conversion job. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum JobState {
    Idle,
    Classifying,
    ProcessingFrames,
    ProcessingVideos,
    Finalizing,
    Done,
}

impl JobState {
    pub fn can_advance_to(self, next: JobState) -> bool {
        next > self
    }

    pub fn is_terminal(self) -> bool {
        self == JobState::Done
    }
}

/// A file the job could not convert
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Summary of a finished job
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobReport {
    /// Outputs written by this run
    pub converted: Vec<PathBuf>,
    /// Outputs left untouched because they already existed
    pub skipped: Vec<PathBuf>,
    /// Failures recorded under [`FailurePolicy::ContinueOnError`]
    pub failures: Vec<FileFailure>,
    /// A lone image that was not converted
    pub dropped_frame: Option<String>,
}

impl JobReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
