//! Image staging adapter
//!
//! Decodes each source image and writes it losslessly as a numbered PNG so
//! the encoder can read the set as one input pattern.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use tracing::debug;

use crate::domain::rules::sequence_file_name;
use crate::error::{CutError, CutResult};
use crate::ports::StagingPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageStagingAdapter;

impl ImageStagingAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn stage_blocking(sources: &[PathBuf], target_dir: &Path) -> CutResult<usize> {
    for (index, source) in sources.iter().enumerate() {
        let target = target_dir.join(sequence_file_name(index + 1));
        let img = image::open(source).map_err(|e| CutError::Image {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;
        img.save_with_format(&target, ImageFormat::Png)
            .map_err(|e| CutError::Image {
                path: target.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(file = %source.display(), output = %target.display(), "Staged frame");
    }
    Ok(sources.len())
}

#[async_trait]
impl StagingPort for ImageStagingAdapter {
    async fn stage_frames(&self, sources: Vec<PathBuf>, target_dir: &Path) -> CutResult<usize> {
        let target_dir = target_dir.to_path_buf();
        tokio::task::spawn_blocking(move || stage_blocking(&sources, &target_dir))
            .await
            .map_err(|e| CutError::TaskFailed {
                message: e.to_string(),
            })?
    }
}
