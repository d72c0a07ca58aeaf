// Unit tests for the convert interactor

use super::*;
use crate::domain::model::{ProcessOutcome, TimeSpec, VideoOption};
use crate::engine::command::CommandLine;
use crate::ports::ProbePort;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Default)]
struct FakeProbe {
    codec: String,
    rate: Option<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl ProbePort for FakeProbe {
    async fn query(&self, args: &[String]) -> CutResult<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        if args.iter().any(|a| a == "stream=codec_name") {
            Ok(self.codec.clone())
        } else if args.iter().any(|a| a == "stream=r_frame_rate") {
            Ok(self.rate.clone().unwrap_or_else(|| "30/1".into()))
        } else {
            Ok("0:00:10.000000".into())
        }
    }
}

#[derive(Default)]
struct FakeEncoder {
    commands: Mutex<Vec<CommandLine>>,
    exit_codes: Mutex<VecDeque<i32>>,
    writes_output: bool,
}

impl FakeEncoder {
    fn failing_first() -> Self {
        Self {
            exit_codes: Mutex::new(VecDeque::from(vec![1])),
            ..Self::default()
        }
    }

    /// Leaves a partial output behind, as a killed encoder would
    fn failing_after_write() -> Self {
        Self {
            writes_output: true,
            ..Self::failing_first()
        }
    }

    fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncoderPort for FakeEncoder {
    async fn run(
        &self,
        command: &CommandLine,
        sink: &dyn ProgressSink,
        _cancel: &CancellationToken,
    ) -> CutResult<ProcessOutcome> {
        self.commands.lock().unwrap().push(command.clone());
        sink.set_current_frame(42);
        if self.writes_output {
            let output = command.arguments().last().unwrap();
            std::fs::write(output, b"partial").unwrap();
        }
        let code = self.exit_codes.lock().unwrap().pop_front().unwrap_or(0);
        Ok(ProcessOutcome {
            code: Some(code),
            stdout: String::new(),
            stderr: "Conversion failed!".into(),
        })
    }
}

#[derive(Default)]
struct FakeStaging {
    calls: Mutex<Vec<Vec<PathBuf>>>,
}

#[async_trait]
impl StagingPort for FakeStaging {
    async fn stage_frames(&self, sources: Vec<PathBuf>, _target_dir: &Path) -> CutResult<usize> {
        let count = sources.len();
        self.calls.lock().unwrap().push(sources);
        Ok(count)
    }
}

#[derive(Default)]
struct CountingReveal {
    count: AtomicUsize,
}

impl RevealPort for CountingReveal {
    fn reveal(&self, _directory: &Path) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct RecordingSink {
    totals: Mutex<Vec<u64>>,
    current: AtomicU64,
    errors: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingSink {
    fn set_total_frames(&self, total: u64) {
        self.totals.lock().unwrap().push(total);
    }

    fn set_current_frame(&self, current: u64) {
        self.current.store(current, Ordering::SeqCst);
    }

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    probe: Arc<FakeProbe>,
    encoder: Arc<FakeEncoder>,
    staging: Arc<FakeStaging>,
    reveal: Arc<CountingReveal>,
    interactor: ConvertInteractor,
}

fn harness(codec: &str, encoder: FakeEncoder) -> Harness {
    harness_with_probe(
        FakeProbe {
            codec: codec.into(),
            ..FakeProbe::default()
        },
        encoder,
    )
}

fn harness_with_probe(probe: FakeProbe, encoder: FakeEncoder) -> Harness {
    let probe = Arc::new(probe);
    let encoder = Arc::new(encoder);
    let staging = Arc::new(FakeStaging::default());
    let reveal = Arc::new(CountingReveal::default());
    let interactor = ConvertInteractor::new(
        ProbeClient::new(probe.clone()),
        encoder.clone(),
        staging.clone(),
        reveal.clone(),
        OptionTables::default(),
        "ffmpeg",
    );
    Harness {
        probe,
        encoder,
        staging,
        reveal,
        interactor,
    }
}

fn job(dir: &Path, files: &[&str], video: VideoOption) -> JobRequest {
    JobRequest {
        start: TimeSpec::ZERO,
        end: TimeSpec::ZERO,
        working_dir: dir.to_path_buf(),
        files: files.iter().map(|f| f.to_string()).collect(),
        video,
        audio_target: "aac".into(),
        scale: "-2:720".into(),
        crf: "23".into(),
        input_framerate: None,
        failure_policy: FailurePolicy::FailFast,
    }
}

fn h264() -> VideoOption {
    VideoOption::new("h264", "-c:v libx264 -crf <crf> -vf scale=<res>", ".mp4")
}

#[tokio::test]
async fn test_video_is_converted_and_revealed() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::default());
    let sink = RecordingSink::default();
    let request = job(dir.path(), &["talk.mkv"], h264());

    let report = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.converted, vec![dir.path().join("_talk_[_].mp4")]);
    assert!(report.is_clean());

    let commands = h.encoder.commands();
    assert_eq!(commands.len(), 1);
    let args = commands[0].arguments();
    let input = dir.path().join("talk.mkv").to_string_lossy().into_owned();
    assert_eq!(&args[..3], &["-sn".to_string(), "-i".to_string(), input]);
    // Source already has the requested codec
    assert!(args.windows(2).any(|w| w == ["-c:a", "copy"]));
    assert!(args.windows(2).any(|w| w == ["-crf", "23"]));
    let output = dir.path().join("_talk_[_].mp4").to_string_lossy().into_owned();
    assert_eq!(&args[args.len() - 2..], &["scale=-2:720".to_string(), output]);

    assert_eq!(*sink.totals.lock().unwrap(), vec![300, 1]);
    assert_eq!(sink.current.load(Ordering::SeqCst), 1);
    assert_eq!(h.reveal.count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_audio_is_reencoded_when_codec_differs() {
    let dir = TempDir::new().unwrap();
    let h = harness("ac3", FakeEncoder::default());
    let request = job(dir.path(), &["movie.mp4"], h264());

    h.interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();

    let args = h.encoder.commands()[0].arguments().to_vec();
    assert!(args.windows(4).any(|w| w == ["-c:a", "aac", "-b:a", "192k"]));
}

#[tokio::test]
async fn test_existing_output_spawns_nothing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("_clip_[_].mp4"), b"done").unwrap();
    let h = harness("aac", FakeEncoder::default());
    let request = job(dir.path(), &["clip.mp4"], h264());

    let report = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.skipped, vec![dir.path().join("_clip_[_].mp4")]);
    assert!(report.converted.is_empty());
    assert!(h.encoder.commands().is_empty());
    assert!(h.probe.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_single_image_is_dropped() {
    let dir = TempDir::new().unwrap();
    let h = harness("", FakeEncoder::default());
    let request = job(dir.path(), &["only.png"], h264());

    let report = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.dropped_frame.as_deref(), Some("only.png"));
    assert!(report.converted.is_empty());
    assert!(h.encoder.commands().is_empty());
    assert!(h.staging.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_images_become_one_sequence() {
    let dir = TempDir::new().unwrap();
    let h = harness("", FakeEncoder::default());
    let sink = RecordingSink::default();
    let request = job(dir.path(), &["c.png", "a.png", "b.JPG"], h264());

    let report = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.converted, vec![dir.path().join("_c_[_].mp4")]);

    let staged = h.staging.calls.lock().unwrap().clone();
    assert_eq!(
        staged,
        vec![vec![
            dir.path().join("a.png"),
            dir.path().join("b.JPG"),
            dir.path().join("c.png"),
        ]]
    );

    let commands = h.encoder.commands();
    assert_eq!(commands.len(), 1);
    let input = &commands[0].arguments()[2];
    assert!(input.ends_with("%05d.png"));
    assert_eq!(*sink.totals.lock().unwrap(), vec![3, 1]);
    // Sequences have no audio to probe
    assert!(h.probe.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_frame_extraction_creates_directory() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::default());
    let request = job(dir.path(), &["clip.mp4"], VideoOption::new("frames", "", "/%05d.png"));

    h.interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(dir.path().join("_clip_[_]").is_dir());
    let commands = h.encoder.commands();
    assert!(commands[0].arguments().last().unwrap().ends_with("%05d.png"));

    // Second run finds the directory and skips
    let again = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(again.skipped.len(), 1);
    assert_eq!(h.encoder.commands().len(), 1);
}

#[tokio::test]
async fn test_fail_fast_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::failing_first());
    let sink = RecordingSink::default();
    let request = job(dir.path(), &["one.mp4", "two.mp4"], h264());

    let result = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await;

    match result {
        Err(CutError::ProcessFailure { code, output, .. }) => {
            assert_eq!(code, Some(1));
            assert!(output.contains("Conversion failed!"));
        }
        other => panic!("expected process failure, got {other:?}"),
    }
    assert_eq!(h.encoder.commands().len(), 1);
    assert_eq!(sink.errors.lock().unwrap().len(), 1);
    assert!(sink.errors.lock().unwrap()[0].starts_with("one.mp4"));
    assert_eq!(h.reveal.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_continue_on_error_records_failure() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::failing_first());
    let sink = RecordingSink::default();
    let mut request = job(dir.path(), &["one.mp4", "two.mp4"], h264());
    request.failure_policy = FailurePolicy::ContinueOnError;

    let report = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, "one.mp4");
    assert_eq!(report.converted, vec![dir.path().join("_two_[_].mp4")]);
    assert!(!report.is_clean());
    assert_eq!(h.reveal.count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cancelled_job_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::default());
    let mut request = job(dir.path(), &["one.mp4"], h264());
    request.failure_policy = FailurePolicy::ContinueOnError;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = h
        .interactor
        .execute(&request, &RecordingSink::default(), &cancel)
        .await;

    assert!(matches!(result, Err(CutError::Cancelled)));
    assert!(h.encoder.commands().is_empty());
    assert_eq!(h.reveal.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_audio_target_fails_before_work() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::default());
    let mut request = job(dir.path(), &["one.mp4"], h264());
    request.audio_target = "wma".into();

    let sink = RecordingSink::default();

    let result = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CutError::UnknownOption { kind: "audio", .. })));
    assert!(h.encoder.commands().is_empty());
    let errors = sink.errors.lock().unwrap().clone();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("wma"));
}

#[tokio::test]
async fn test_end_before_start_fails_before_work() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::default());
    let mut request = job(dir.path(), &["one.mp4"], h264());
    request.start = TimeSpec::new(0, 1, 0, 0);
    request.end = TimeSpec::new(0, 0, 30, 0);
    let sink = RecordingSink::default();

    let result = h
        .interactor
        .execute(&request, &sink, &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CutError::InvalidRange { .. })));
    assert!(h.encoder.commands().is_empty());
    assert!(h.probe.calls.lock().unwrap().is_empty());
    assert_eq!(sink.errors.lock().unwrap().len(), 1);
    assert_eq!(h.reveal.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_bad_frame_rate_leaves_no_frame_directory() {
    let dir = TempDir::new().unwrap();
    let frames = VideoOption::new("frames", "", "/%05d.png");
    let request = job(dir.path(), &["clip.mp4"], frames);
    let broken = harness_with_probe(
        FakeProbe {
            codec: "aac".into(),
            rate: Some("30/1/garbage".into()),
            ..FakeProbe::default()
        },
        FakeEncoder::default(),
    );

    let result = broken
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CutError::UnsupportedFormat { .. })));
    assert!(!dir.path().join("_clip_[_]").exists());
    assert!(broken.encoder.commands().is_empty());

    // A later run still converts the file instead of skipping it
    let h = harness("aac", FakeEncoder::default());
    let report = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.converted.len(), 1);
    assert_eq!(h.encoder.commands().len(), 1);
}

#[tokio::test]
async fn test_failed_encode_removes_partial_output() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::failing_after_write());
    let mut request = job(dir.path(), &["one.mp4", "two.mp4"], h264());
    request.failure_policy = FailurePolicy::ContinueOnError;

    let report = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(!dir.path().join("_one_[_].mp4").exists());
    assert!(dir.path().join("_two_[_].mp4").exists());
}

#[tokio::test]
async fn test_failed_frame_extraction_removes_directory() {
    let dir = TempDir::new().unwrap();
    let h = harness("aac", FakeEncoder::failing_after_write());
    let request = job(dir.path(), &["clip.mp4"], VideoOption::new("frames", "", "/%05d.png"));

    let result = h
        .interactor
        .execute(&request, &RecordingSink::default(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CutError::ProcessFailure { .. })));
    assert!(!dir.path().join("_clip_[_]").exists());
}
