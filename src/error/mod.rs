//! Error handling module for cut-videos

use thiserror::Error;

/// Main error type for conversion operations
#[derive(Error, Debug)]
pub enum CutError {
    /// Malformed time string
    #[error("Invalid time format: {time}. Expected [[H-]M-]S[.ff] or HH:MM:SS.fff")]
    Format { time: String },

    /// Probe printed a frame rate of an unexpected shape
    #[error("Unsupported frame rate value: {value:?}")]
    UnsupportedFormat { value: String },

    /// End time lies before the start of the seek window
    #[error("Invalid time range: end ({end}) is before start ({start})")]
    InvalidRange { start: String, end: String },

    /// Audio or video option missing from the option tables
    #[error("Unknown {kind} option: {name}")]
    UnknownOption { kind: &'static str, name: String },

    /// External tool exited with a non-zero status
    #[error("{program} exited with status {code:?}: {output}")]
    ProcessFailure {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// External tool could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External tool did not finish in time
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// Job was cancelled by the caller
    #[error("Conversion cancelled")]
    Cancelled,

    /// Frame staging failed to decode or encode an image
    #[error("Image staging failed for {path}: {message}")]
    Image { path: String, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A background task panicked or was aborted
    #[error("Background task failed: {message}")]
    TaskFailed { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CutError {
    pub(crate) fn format(time: impl Into<String>) -> Self {
        CutError::Format { time: time.into() }
    }

    pub(crate) fn unsupported_format(value: impl Into<String>) -> Self {
        CutError::UnsupportedFormat {
            value: value.into(),
        }
    }
}

/// Result type alias for conversion operations
pub type CutResult<T> = std::result::Result<T, CutError>;
