// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_stage;
pub mod probe_ffprobe;
pub mod reveal;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use fs_stage::ImageStagingAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use reveal::{NoRevealAdapter, SystemRevealAdapter};
pub use toml_config::AppConfig;
