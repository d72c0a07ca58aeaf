//! Path helpers for input and output names

use std::path::Path;

/// File name without its final extension
pub fn file_stem(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Final extension including the leading dot, or empty
pub fn extension_with_dot(file: &str) -> String {
    Path::new(file)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Quote a token for display in a POSIX shell, only when needed
pub fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+%,@".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
