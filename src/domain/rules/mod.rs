// Domain rules - Input classification, output naming and probe parsing

use std::path::Path;

use crate::domain::model::TimeSpec;
use crate::domain::options::{IMAGE_TYPES, SEQUENCE_DIGITS, STAGED_EXTENSION};
use crate::error::{CutError, CutResult};
use crate::utils::path::{extension_with_dot, file_stem};

/// True when the file's extension is in the image set (case-insensitive)
pub fn is_image(file: &str) -> bool {
    let ext = extension_with_dot(file).to_lowercase();
    IMAGE_TYPES.contains(&ext.as_str())
}

/// Split inputs into `(images, videos)`, each keeping the given order
pub fn classify(files: &[String]) -> (Vec<String>, Vec<String>) {
    files.iter().cloned().partition(|file| is_image(file))
}

/// `_<stem>_[<start>_<end>]`, the output name for an input without its suffix
pub fn output_name(file: &str, start: &TimeSpec, end: &TimeSpec) -> String {
    format!("_{}_[{}_{}]", file_stem(file), start.to_short(), end.to_short())
}

/// Name of the staged frame with 1-based `index`
pub fn sequence_file_name(index: usize) -> String {
    format!("{:0width$}{}", index, STAGED_EXTENSION, width = SEQUENCE_DIGITS)
}

/// printf-style pattern matching every staged frame name
pub fn sequence_pattern() -> String {
    format!("%0{}d{}", SEQUENCE_DIGITS, STAGED_EXTENSION)
}

/// Parse the frame rate printed by the probe.
///
/// Accepts `num/den`, and the three part shape `num/den\nnum/den` some
/// containers produce when they report more than one video stream, in which
/// case only the first rate counts. No output at all means an audio-only
/// input and yields one frame per second.
pub fn parse_frame_rate(output: &str) -> CutResult<f64> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(1.0);
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    let (num, den) = match parts.as_slice() {
        [num, den] => (*num, *den),
        [num, den_and_rest, _] if den_and_rest.contains('\n') => {
            let den = den_and_rest.split('\n').next().unwrap_or_default();
            (*num, den)
        }
        _ => return Err(CutError::unsupported_format(trimmed)),
    };

    let num = parse_rate_part(num, trimmed)?;
    let den = parse_rate_part(den, trimmed)?;
    if den == 0.0 {
        return Err(CutError::unsupported_format(trimmed));
    }

    Ok(num / den)
}

/// Plain decimal digits with at most one point; `inf`, `NaN` and
/// exponents are rejected
fn parse_rate_part(part: &str, raw: &str) -> CutResult<f64> {
    let part = part.trim();
    let plain = part.chars().all(|c| c.is_ascii_digit() || c == '.')
        && part.chars().filter(|&c| c == '.').count() <= 1;
    if !plain {
        return Err(CutError::unsupported_format(raw));
    }
    part.parse().map_err(|_| CutError::unsupported_format(raw))
}

/// Probe arguments printing the codec of the first audio stream
pub fn audio_codec_query(file: &Path) -> Vec<String> {
    stream_query("a:0", "stream=codec_name", file)
}

/// Probe arguments printing the first video stream's frame rate fraction
pub fn frame_rate_query(file: &Path) -> Vec<String> {
    stream_query("v:0", "stream=r_frame_rate", file)
}

/// Probe arguments printing the container duration as `H:MM:SS.micro`
pub fn duration_query(file: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        "-sexagesimal".into(),
        file.to_string_lossy().into_owned(),
    ]
}

fn stream_query(selector: &str, entries: &str, file: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-select_streams".into(),
        selector.into(),
        "-show_entries".into(),
        entries.into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        file.to_string_lossy().into_owned(),
    ]
}
