//! cut-videos library
//!
//! Batch trimming and conversion of videos and image sequences by driving
//! ffmpeg and ffprobe as external processes. The domain layer holds the time
//! codec, option tables and naming rules; the engine builds commands and
//! follows encoder progress; adapters talk to the outside world and the
//! application layer runs jobs over them.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{FailurePolicy, JobReport, JobRequest, TimeSpec, VideoOption};
pub use domain::options::OptionTables;
pub use error::{CutError, CutResult};
