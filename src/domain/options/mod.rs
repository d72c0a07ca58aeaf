// Option tables - Static mapping from user choices to encoder flags

use std::collections::BTreeMap;

use crate::domain::model::VideoOption;
use crate::error::{CutError, CutResult};

/// Audio option that stream-copies the source audio
pub const NATIVE_FORMAT: &str = "Native format";

/// Extensions (lowercase, dot included) treated as still images
pub const IMAGE_TYPES: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".bmp", ".tif", ".tiff", ".webp",
];

/// Width of the renumbered image sequence names (`00001.png`)
pub const SEQUENCE_DIGITS: usize = 5;

/// Extension of the staged, losslessly re-encoded frames
pub const STAGED_EXTENSION: &str = ".png";

const DEFAULT_AUDIO_OPTIONS: &[(&str, &str)] = &[
    (NATIVE_FORMAT, "-c:a copy"),
    ("aac", "-c:a aac -b:a 192k"),
    ("opus", "-c:a libopus -b:a 160k"),
    ("vorbis", "-c:a libvorbis -q:a 5"),
    ("mp3", "-c:a libmp3lame -q:a 2"),
    ("flac", "-c:a flac"),
    ("No audio", "-an"),
];

const DEFAULT_VIDEO_OPTIONS: &[(&str, &str, &str)] = &[
    ("copy", "-c:v copy", "%ext"),
    (
        "h264",
        "-c:v libx264 -preset slow -crf <crf> -vf scale=<res> -pix_fmt yuv420p",
        ".mp4",
    ),
    ("h265", "-c:v libx265 -preset medium -crf <crf> -vf scale=<res>", ".mp4"),
    ("vp9", "-c:v libvpx-vp9 -b:v 0 -crf <crf> -vf scale=<res>", ".webm"),
    ("av1", "-c:v libaom-av1 -b:v 0 -crf <crf> -vf scale=<res>", ".mkv"),
    ("gif", "-vf scale=<res>:flags=lanczos", ".gif"),
    ("frames", "", "/%05d.png"),
];

/// Audio and video option tables, defaults plus configured extras
#[derive(Debug, Clone)]
pub struct OptionTables {
    audio: Vec<(String, String)>,
    video: Vec<VideoOption>,
}

impl Default for OptionTables {
    fn default() -> Self {
        Self {
            audio: DEFAULT_AUDIO_OPTIONS
                .iter()
                .map(|(name, fragment)| (name.to_string(), fragment.to_string()))
                .collect(),
            video: DEFAULT_VIDEO_OPTIONS
                .iter()
                .map(|(name, command, suffix)| VideoOption::new(*name, *command, *suffix))
                .collect(),
        }
    }
}

impl OptionTables {
    /// Defaults overlaid with configured entries; a configured name replaces
    /// the default of the same name
    pub fn with_extras(
        audio: &BTreeMap<String, String>,
        video: &BTreeMap<String, VideoOption>,
    ) -> Self {
        let mut tables = Self::default();
        for (name, fragment) in audio {
            match tables.audio.iter_mut().find(|(known, _)| known == name) {
                Some(entry) => entry.1 = fragment.clone(),
                None => tables.audio.push((name.clone(), fragment.clone())),
            }
        }
        for (name, option) in video {
            let option = VideoOption::new(name.clone(), option.command.clone(), option.suffix.clone());
            match tables.video.iter_mut().find(|known| &known.name == name) {
                Some(entry) => *entry = option,
                None => tables.video.push(option),
            }
        }
        tables
    }

    /// Encoder flags for an audio option
    pub fn audio_fragment(&self, name: &str) -> CutResult<&str> {
        self.audio
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, fragment)| fragment.as_str())
            .ok_or_else(|| CutError::UnknownOption {
                kind: "audio",
                name: name.to_string(),
            })
    }

    /// Stream-copy flags
    pub fn copy_fragment(&self) -> &str {
        self.audio_fragment(NATIVE_FORMAT).unwrap_or("-c:a copy")
    }

    pub fn video_option(&self, name: &str) -> CutResult<&VideoOption> {
        self.video
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CutError::UnknownOption {
                kind: "video",
                name: name.to_string(),
            })
    }

    pub fn audio_options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.audio.iter().map(|(name, fragment)| (name.as_str(), fragment.as_str()))
    }

    pub fn video_options(&self) -> impl Iterator<Item = &VideoOption> {
        self.video.iter()
    }
}
