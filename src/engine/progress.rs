//! Progress reporting shared between a conversion task and its front end

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Receiver of frame progress from a running job
pub trait ProgressSink: Send + Sync {
    /// Frames expected for the current step
    fn set_total_frames(&self, total: u64);

    /// Last frame the encoder reported
    fn set_current_frame(&self, current: u64);

    /// A file failed; the job may or may not continue
    fn report_error(&self, _message: &str) {}
}

/// Lock-free progress counters written by the job task and polled by the UI
#[derive(Debug, Default)]
pub struct ProgressCounters {
    total: AtomicU64,
    current: AtomicU64,
    failures: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl ProgressCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current: self.current.load(Ordering::Acquire),
            total: self.total.load(Ordering::Acquire),
            failures: self.failures.load(Ordering::Acquire),
        }
    }

    /// Most recent error passed to [`ProgressSink::report_error`]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ProgressSink for ProgressCounters {
    fn set_total_frames(&self, total: u64) {
        self.total.store(total, Ordering::Release);
    }

    fn set_current_frame(&self, current: u64) {
        self.current.store(current, Ordering::Release);
    }

    fn report_error(&self, message: &str) {
        self.failures.fetch_add(1, Ordering::AcqRel);
        if let Ok(mut guard) = self.last_error.lock() {
            *guard = Some(message.to_string());
        }
    }
}

/// Point-in-time copy of [`ProgressCounters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current: u64,
    pub total: u64,
    pub failures: u64,
}

impl ProgressSnapshot {
    /// Completion in percent, `None` while the total is unknown
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((self.current as f64 / self.total as f64 * 100.0).min(100.0))
    }
}

/// Front-end presentation of job progress
pub trait ProgressRenderer: Send + Sync {
    fn on_progress(&self, snapshot: &ProgressSnapshot);
    fn on_error(&self, error: &str);
    fn on_complete(&self, message: &str);
}

/// Single-line progress bar on stderr
pub struct ConsoleProgressRenderer {
    width: usize,
}

impl ConsoleProgressRenderer {
    pub fn new() -> Self {
        Self { width: 30 }
    }

    pub fn format_bar(&self, snapshot: &ProgressSnapshot) -> String {
        match snapshot.percent() {
            Some(percent) => {
                let filled = ((percent / 100.0) * self.width as f64) as usize;
                format!(
                    "[{}{}] {:>5.1}% frame {}/{}",
                    "#".repeat(filled),
                    "-".repeat(self.width - filled),
                    percent,
                    snapshot.current,
                    snapshot.total
                )
            }
            None => format!("frame {}", snapshot.current),
        }
    }
}

impl Default for ConsoleProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRenderer for ConsoleProgressRenderer {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        eprint!("\r{}", self.format_bar(snapshot));
    }

    fn on_error(&self, error: &str) {
        eprintln!("\nError: {}", error);
    }

    fn on_complete(&self, message: &str) {
        eprintln!("\n{}", message);
    }
}

/// One JSON event per line on stdout
pub struct JsonProgressRenderer;

impl JsonProgressRenderer {
    pub fn progress_event(snapshot: &ProgressSnapshot) -> serde_json::Value {
        serde_json::json!({
            "event": "progress",
            "current": snapshot.current,
            "total": snapshot.total,
            "percent": snapshot.percent(),
            "failures": snapshot.failures,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }
}

impl ProgressRenderer for JsonProgressRenderer {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        println!("{}", Self::progress_event(snapshot));
    }

    fn on_error(&self, error: &str) {
        let event = serde_json::json!({
            "event": "error",
            "error": error,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!("{}", event);
    }

    fn on_complete(&self, message: &str) {
        let event = serde_json::json!({
            "event": "complete",
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!("{}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let counters = ProgressCounters::new();
        assert_eq!(counters.snapshot(), ProgressSnapshot::default());

        counters.set_total_frames(200);
        counters.set_current_frame(50);
        let snapshot = counters.snapshot();
        assert_eq!(snapshot.current, 50);
        assert_eq!(snapshot.total, 200);
        assert_eq!(snapshot.percent(), Some(25.0));
    }

    #[test]
    fn test_report_error_counts_and_keeps_last() {
        let counters = ProgressCounters::new();
        assert!(counters.last_error().is_none());
        counters.report_error("first");
        counters.report_error("second");
        assert_eq!(counters.snapshot().failures, 2);
        assert_eq!(counters.last_error().as_deref(), Some("second"));
    }

    #[test]
    fn test_percent_caps_and_unknown_total() {
        let over = ProgressSnapshot {
            current: 120,
            total: 100,
            failures: 0,
        };
        assert_eq!(over.percent(), Some(100.0));
        assert_eq!(ProgressSnapshot::default().percent(), None);
    }

    #[test]
    fn test_console_bar() {
        let renderer = ConsoleProgressRenderer::new();
        let half = ProgressSnapshot {
            current: 5,
            total: 10,
            failures: 0,
        };
        let bar = renderer.format_bar(&half);
        assert!(bar.starts_with(&format!("[{}{}]", "#".repeat(15), "-".repeat(15))));
        assert!(bar.ends_with("50.0% frame 5/10"));

        let unknown = ProgressSnapshot {
            current: 7,
            total: 0,
            failures: 0,
        };
        assert_eq!(renderer.format_bar(&unknown), "frame 7");
    }

    #[test]
    fn test_json_progress_event() {
        let event = JsonProgressRenderer::progress_event(&ProgressSnapshot {
            current: 1,
            total: 4,
            failures: 0,
        });
        assert_eq!(event["event"], "progress");
        assert_eq!(event["percent"], 25.0);
        assert!(event["timestamp"].is_string());
    }
}
