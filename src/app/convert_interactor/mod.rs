// Convert interactor - Orchestrates one conversion job over images and videos

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domain::model::{
    AudioDecision, FailurePolicy, FileFailure, JobReport, JobRequest, JobState,
};
use crate::domain::options::{OptionTables, STAGED_EXTENSION};
use crate::domain::rules::{classify, output_name, sequence_pattern};
use crate::engine::command::{
    build_audio_fragment, build_full_command, check_output, discard_partial_output,
    ensure_frame_dir, OutputAction, StaticPrefix,
};
use crate::engine::progress::ProgressSink;
use crate::error::{CutError, CutResult};
use crate::ports::{EncoderPort, RevealPort, StagingPort};
use crate::probe::ProbeClient;
use crate::utils::path::extension_with_dot;

/// Lines of encoder output kept in a failure message
const FAILURE_TAIL_LINES: usize = 10;

/// Result of handling one input
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileOutcome {
    Converted(PathBuf),
    Skipped(PathBuf),
}

/// Per-job values shared by every file of the job
struct JobContext<'a> {
    job: &'a JobRequest,
    prefix: StaticPrefix,
    video_fragment: String,
    sink: &'a dyn ProgressSink,
    cancel: &'a CancellationToken,
}

/// Interactor for the conversion use case
pub struct ConvertInteractor {
    probe: ProbeClient,
    encoder: Arc<dyn EncoderPort>,
    staging: Arc<dyn StagingPort>,
    reveal: Arc<dyn RevealPort>,
    tables: OptionTables,
    ffmpeg_path: PathBuf,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        probe: ProbeClient,
        encoder: Arc<dyn EncoderPort>,
        staging: Arc<dyn StagingPort>,
        reveal: Arc<dyn RevealPort>,
        tables: OptionTables,
        ffmpeg_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            probe,
            encoder,
            staging,
            reveal,
            tables,
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn tables(&self) -> &OptionTables {
        &self.tables
    }

    /// Run a job to completion.
    ///
    /// Images go first as one sequence, then each video in the given order.
    /// On success the progress is set to full and the working directory is
    /// revealed. Under [`FailurePolicy::FailFast`] the first failing file
    /// ends the job with its error; otherwise failures are collected in the
    /// report. Cancellation always ends the job.
    pub async fn execute(
        &self,
        job: &JobRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> CutResult<JobReport> {
        let mut state = JobState::Idle;
        let mut report = JobReport::default();

        // Option and window errors are fatal before any file is touched
        let ctx = match self.job_context(job, sink, cancel) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("Job rejected: {}", e);
                sink.report_error(&e.to_string());
                return Err(e);
            }
        };

        info!(
            files = job.files.len(),
            video = %job.video.name,
            audio = %job.audio_target,
            "Starting conversion job"
        );

        advance(&mut state, JobState::Classifying);
        let (images, videos) = classify(&job.files);

        advance(&mut state, JobState::ProcessingFrames);
        match images.len() {
            0 => {}
            1 => {
                warn!(file = %images[0], "Single image is not converted");
                report.dropped_frame = Some(images[0].clone());
            }
            _ => {
                let result = self.convert_frames(&ctx, &images).await;
                record(&ctx, &images[0], result, &mut report)?;
            }
        }

        advance(&mut state, JobState::ProcessingVideos);
        for video in &videos {
            let result = self.convert_video(&ctx, video).await;
            record(&ctx, video, result, &mut report)?;
        }

        advance(&mut state, JobState::Finalizing);
        sink.set_total_frames(1);
        sink.set_current_frame(1);

        advance(&mut state, JobState::Done);
        info!(
            converted = report.converted.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Conversion job finished"
        );
        self.reveal.reveal(&job.working_dir);

        Ok(report)
    }

    fn job_context<'a>(
        &self,
        job: &'a JobRequest,
        sink: &'a dyn ProgressSink,
        cancel: &'a CancellationToken,
    ) -> CutResult<JobContext<'a>> {
        self.tables.audio_fragment(&job.audio_target)?;
        Ok(JobContext {
            job,
            prefix: StaticPrefix::build(job)?,
            video_fragment: job.video.resolve_command(&job.scale, &job.crf),
            sink,
            cancel,
        })
    }

    /// Stage the images as one numbered sequence and encode it once
    async fn convert_frames(&self, ctx: &JobContext<'_>, images: &[String]) -> CutResult<FileOutcome> {
        check_cancelled(ctx.cancel)?;
        let job = ctx.job;
        let first = &images[0];
        let output = job.working_dir.join(format!(
            "{}{}",
            output_name(first, &job.start, &job.end),
            job.video.resolve_suffix(STAGED_EXTENSION)
        ));

        if check_output(&output, &ctx.video_fragment).await? == OutputAction::SkipExisting {
            return Ok(FileOutcome::Skipped(output));
        }

        let scratch = TempDir::new()?;
        let mut ordered = images.to_vec();
        ordered.sort();
        let sources = ordered.iter().map(|name| job.working_dir.join(name)).collect();

        let staged = self.staging.stage_frames(sources, scratch.path()).await?;
        info!(file = %first, frames = staged, "Staged image sequence");
        ctx.sink.set_total_frames(staged as u64);
        ctx.sink.set_current_frame(0);

        // A staged sequence carries no audio stream
        let audio = build_audio_fragment(&self.tables, "", &job.audio_target)?;
        let input = scratch.path().join(sequence_pattern());
        self.encode(ctx, &audio, &input, &output).await?;

        Ok(FileOutcome::Converted(output))
    }

    async fn convert_video(&self, ctx: &JobContext<'_>, file: &str) -> CutResult<FileOutcome> {
        check_cancelled(ctx.cancel)?;
        let job = ctx.job;
        let input = job.working_dir.join(file);
        let output = job.working_dir.join(format!(
            "{}{}",
            output_name(file, &job.start, &job.end),
            job.video.resolve_suffix(&extension_with_dot(file))
        ));

        if check_output(&output, &ctx.video_fragment).await? == OutputAction::SkipExisting {
            return Ok(FileOutcome::Skipped(output));
        }

        let frames = self.probe.expected_frames(job, &input).await?;
        ctx.sink.set_total_frames(frames);
        ctx.sink.set_current_frame(0);

        let source_codec = self.probe.audio_codec(&input).await?;
        let audio = build_audio_fragment(&self.tables, &source_codec, &job.audio_target)?;
        self.encode(ctx, &audio, &input, &output).await?;

        Ok(FileOutcome::Converted(output))
    }

    async fn encode(
        &self,
        ctx: &JobContext<'_>,
        audio: &AudioDecision,
        input: &Path,
        output: &Path,
    ) -> CutResult<()> {
        let command = build_full_command(
            &self.ffmpeg_path,
            &ctx.prefix,
            audio,
            &ctx.video_fragment,
            input,
            output,
        );

        let created_dir = ensure_frame_dir(output, &ctx.video_fragment).await?;
        let started = Instant::now();
        let result = match self.encoder.run(&command, ctx.sink, ctx.cancel).await {
            Ok(outcome) if outcome.success() => Ok(()),
            Ok(outcome) => Err(CutError::ProcessFailure {
                program: command.program_name(),
                code: outcome.code,
                output: outcome.tail(FAILURE_TAIL_LINES),
            }),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            discard_partial_output(output, created_dir.as_deref()).await;
            return Err(e);
        }
        info!(
            output = %output.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Converted"
        );
        Ok(())
    }
}

fn advance(state: &mut JobState, next: JobState) {
    debug_assert!(state.can_advance_to(next), "{:?} -> {:?}", state, next);
    tracing::debug!(from = ?state, to = ?next, "Job state");
    *state = next;
}

fn check_cancelled(cancel: &CancellationToken) -> CutResult<()> {
    if cancel.is_cancelled() {
        return Err(CutError::Cancelled);
    }
    Ok(())
}

/// Fold one file's result into the report, or end the job
fn record(
    ctx: &JobContext<'_>,
    file: &str,
    result: CutResult<FileOutcome>,
    report: &mut JobReport,
) -> CutResult<()> {
    match result {
        Ok(FileOutcome::Converted(output)) => report.converted.push(output),
        Ok(FileOutcome::Skipped(output)) => report.skipped.push(output),
        Err(CutError::Cancelled) => {
            warn!(file, "Conversion cancelled");
            return Err(CutError::Cancelled);
        }
        Err(e) => {
            error!(file, "Conversion failed: {}", e);
            ctx.sink.report_error(&format!("{}: {}", file, e));
            match ctx.job.failure_policy {
                FailurePolicy::FailFast => return Err(e),
                FailurePolicy::ContinueOnError => report.failures.push(FileFailure {
                    file: file.to_string(),
                    message: e.to_string(),
                }),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
