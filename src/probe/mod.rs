//! Media metadata queries on top of the probe port

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::model::{JobRequest, TimeSpec};
use crate::domain::rules::{audio_codec_query, duration_query, frame_rate_query, parse_frame_rate};
use crate::error::CutResult;
use crate::ports::ProbePort;

/// Read-only metadata lookups used while planning a conversion
#[derive(Clone)]
pub struct ProbeClient {
    port: Arc<dyn ProbePort>,
}

impl ProbeClient {
    pub fn new(port: Arc<dyn ProbePort>) -> Self {
        Self { port }
    }

    /// Codec of the first audio stream, empty when there is none
    pub async fn audio_codec(&self, path: &Path) -> CutResult<String> {
        let codec = self.port.query(&audio_codec_query(path)).await?;
        let codec = codec.trim().to_string();
        debug!(file = %path.display(), codec = %codec, "Probed audio codec");
        Ok(codec)
    }

    /// Frames per second of the first video stream, 1.0 for audio-only inputs
    pub async fn frame_rate(&self, path: &Path) -> CutResult<f64> {
        let raw = self.port.query(&frame_rate_query(path)).await?;
        let rate = parse_frame_rate(&raw)?;
        debug!(file = %path.display(), rate, "Probed frame rate");
        Ok(rate)
    }

    /// Container duration
    pub async fn total_duration(&self, path: &Path) -> CutResult<TimeSpec> {
        let raw = self.port.query(&duration_query(path)).await?;
        TimeSpec::from_clock(raw.trim())
    }

    /// Length in seconds of the window `job` cuts from `path`.
    ///
    /// A zero end time stands for the end of the file, which is then probed.
    pub async fn duration(&self, job: &JobRequest, path: &Path) -> CutResult<f64> {
        let end = if job.end.is_zero() {
            self.total_duration(path).await?
        } else {
            job.end
        };
        end.seconds_since(&job.start)
    }

    /// Frames the encoder is expected to emit for `path`
    pub async fn expected_frames(&self, job: &JobRequest, path: &Path) -> CutResult<u64> {
        let seconds = self.duration(job, path).await?;
        let rate = self.frame_rate(path).await?;
        Ok((seconds * rate).round().max(0.0) as u64)
    }
}
