//! Shared fixtures: stand-in encoder and probe scripts

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Answers the three probe queries for a 2 s, 25 fps clip with AAC audio
const FAKE_FFPROBE: &str = r#"#!/bin/sh
case "$*" in
  *codec_name*) echo aac ;;
  *r_frame_rate*) echo 25/1 ;;
  *) echo 0:00:02.000000 ;;
esac
"#;

/// Prints two progress lines and creates its last argument
const FAKE_FFMPEG: &str = r#"#!/bin/sh
for last; do :; done
printf 'frame=   10 fps=0.0 q=0.0 \rframe=   50 fps=0.0 q=0.0 \r' >&2
: > "$last"
"#;

/// Fails like a broken input would
const FAILING_FFMPEG: &str = r#"#!/bin/sh
echo "Invalid data found when processing input" >&2
exit 1
"#;

/// Starts writing its last argument, then hangs until killed
const STALLING_FFMPEG: &str = r#"#!/bin/sh
for last; do :; done
printf 'frame=    5 fps=0.0 q=0.0 \r' >&2
: > "$last"
exec sleep 10
"#;

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
pub fn fake_ffprobe(dir: &Path) -> PathBuf {
    write_script(dir, "ffprobe", FAKE_FFPROBE)
}

#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    write_script(dir, "ffmpeg", FAKE_FFMPEG)
}

#[cfg(unix)]
pub fn failing_ffmpeg(dir: &Path) -> PathBuf {
    write_script(dir, "ffmpeg", FAILING_FFMPEG)
}

#[cfg(unix)]
pub fn stalling_ffmpeg(dir: &Path) -> PathBuf {
    write_script(dir, "ffmpeg-stalling", STALLING_FFMPEG)
}

/// Small solid-colour PNG
pub fn write_png(path: &Path, shade: u8) {
    let mut img = image::RgbImage::new(8, 8);
    for pixel in img.pixels_mut() {
        *pixel = image::Rgb([shade, shade, shade]);
    }
    img.save(path).unwrap();
}
