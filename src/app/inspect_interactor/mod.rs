// Inspect interactor - Reports the metadata a conversion relies on

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::domain::model::{format_span, TimeSpec};
use crate::error::{CutError, CutResult};
use crate::probe::ProbeClient;

/// What the converter sees of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaSummary {
    pub file: String,
    /// Empty when the file has no audio stream
    pub audio_codec: String,
    pub frame_rate: f64,
    /// Clock form, `H:MM:SS[.ffffff]`
    pub duration: String,
    pub duration_seconds: f64,
    pub expected_frames: u64,
}

impl MediaSummary {
    pub fn to_text(&self) -> String {
        let audio = if self.audio_codec.is_empty() {
            "none"
        } else {
            self.audio_codec.as_str()
        };
        format!(
            "File:        {}\nAudio codec: {}\nFrame rate:  {:.3} fps\nDuration:    {} ({:.3}s)\nFrames:      {}",
            self.file, audio, self.frame_rate, self.duration, self.duration_seconds, self.expected_frames
        )
    }
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe: ProbeClient,
}

impl InspectInteractor {
    pub fn new(probe: ProbeClient) -> Self {
        Self { probe }
    }

    pub async fn inspect(&self, path: &Path) -> CutResult<MediaSummary> {
        if !tokio::fs::try_exists(path).await? {
            return Err(CutError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file does not exist: {}", path.display()),
            )));
        }

        info!(file = %path.display(), "Inspecting media file");
        let audio_codec = self.probe.audio_codec(path).await?;
        let frame_rate = self.probe.frame_rate(path).await?;
        let duration: TimeSpec = self.probe.total_duration(path).await?;
        let duration_seconds = duration.as_seconds();

        Ok(MediaSummary {
            file: path.display().to_string(),
            audio_codec,
            frame_rate,
            duration: format_span(duration.total_millis()),
            duration_seconds,
            expected_frames: (duration_seconds * frame_rate).round() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProbePort;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct StaticProbe;

    #[async_trait]
    impl ProbePort for StaticProbe {
        async fn query(&self, args: &[String]) -> CutResult<String> {
            Ok(if args.iter().any(|a| a == "stream=codec_name") {
                String::new()
            } else if args.iter().any(|a| a == "stream=r_frame_rate") {
                "25/1".into()
            } else {
                "0:01:00.500000".into()
            })
        }
    }

    #[tokio::test]
    async fn test_inspect_summary() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"").unwrap();

        let summary = InspectInteractor::new(ProbeClient::new(Arc::new(StaticProbe)))
            .inspect(&file)
            .await
            .unwrap();

        assert_eq!(summary.audio_codec, "");
        assert_eq!(summary.frame_rate, 25.0);
        assert_eq!(summary.duration, "0:01:00.500000");
        assert_eq!(summary.expected_frames, 1513);
        assert!(summary.to_text().contains("Audio codec: none"));
    }

    #[tokio::test]
    async fn test_inspect_missing_file() {
        let result = InspectInteractor::new(ProbeClient::new(Arc::new(StaticProbe)))
            .inspect(Path::new("/nonexistent/clip.mp4"))
            .await;
        assert!(matches!(result, Err(CutError::Io(_))));
    }
}
