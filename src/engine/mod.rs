//! Conversion engine: command assembly, output monitoring and progress

pub mod command;
pub mod monitor;
pub mod progress;

pub use command::{
    build_audio_fragment, build_full_command, check_output, discard_partial_output,
    ensure_frame_dir, CommandLine, OutputAction, StaticPrefix,
};
pub use monitor::{parse_frame, CapturedOutput, ProgressMonitor};
pub use progress::{ProgressCounters, ProgressSink, ProgressSnapshot};
