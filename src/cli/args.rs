//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::{FailurePolicy, JobRequest, TimeSpec};
use crate::domain::options::{OptionTables, NATIVE_FORMAT};
use crate::error::CutResult;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding the input files; outputs are written there too
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Input file names, relative to --dir
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Video option name (see `options`)
    #[arg(long, default_value = "copy")]
    pub video: String,

    /// Audio option name (see `options`)
    #[arg(long, default_value = NATIVE_FORMAT)]
    pub audio: String,

    /// Start time ([[H-]M-]S[.fff] or HH:MM:SS.fff); empty starts at the beginning
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub start: String,

    /// End time, same forms as --start; empty runs to the end
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub end: String,

    /// Value substituted for <res> in the video option
    #[arg(long, default_value = "iw:ih", allow_hyphen_values = true)]
    pub scale: String,

    /// Value substituted for <crf> in the video option
    #[arg(long, default_value = "23")]
    pub crf: String,

    /// Frame rate forced on the input (e.g. 24 or 30000/1001)
    #[arg(long)]
    pub input_framerate: Option<String>,

    /// Record failed files and continue with the rest
    #[arg(long)]
    pub keep_going: bool,

    /// Do not open the output directory when done
    #[arg(long)]
    pub no_reveal: bool,

    /// Emit progress and the final report as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    /// Resolve names and times into a job description
    pub fn to_job(&self, tables: &OptionTables, default_policy: FailurePolicy) -> CutResult<JobRequest> {
        let video = tables.video_option(&self.video)?.clone();
        tables.audio_fragment(&self.audio)?;

        let failure_policy = if self.keep_going {
            FailurePolicy::ContinueOnError
        } else {
            default_policy
        };

        Ok(JobRequest {
            start: parse_time_arg(&self.start)?,
            end: parse_time_arg(&self.end)?,
            working_dir: self.dir.clone(),
            files: self.files.clone(),
            video,
            audio_target: self.audio.clone(),
            scale: self.scale.clone(),
            crf: self.crf.clone(),
            input_framerate: self.input_framerate.clone(),
            failure_policy,
        })
    }
}

/// Time argument in either the short form or the clock form
pub fn parse_time_arg(value: &str) -> CutResult<TimeSpec> {
    if value.contains(':') {
        TimeSpec::from_clock(value)
    } else {
        TimeSpec::from_short(value)
    }
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media file to inspect
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the options command
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
