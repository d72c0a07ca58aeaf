//! Reveal adapter - opens the output directory in the platform file browser

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::ports::RevealPort;

/// Hands the directory to the desktop's file browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRevealAdapter;

impl SystemRevealAdapter {
    pub fn new() -> Self {
        Self
    }

    fn opener() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl RevealPort for SystemRevealAdapter {
    fn reveal(&self, directory: &Path) {
        let opener = Self::opener();
        debug!(command = opener, output = %directory.display(), "Revealing output");
        // Not waited on; the browser outlives us
        if let Err(e) = Command::new(opener)
            .arg(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            warn!(command = opener, "Failed to open output directory: {}", e);
        }
    }
}

/// Used when revealing is disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRevealAdapter;

impl RevealPort for NoRevealAdapter {
    fn reveal(&self, directory: &Path) {
        debug!(output = %directory.display(), "Reveal disabled");
    }
}
