//! RAII-based timing for diff and file operations.
//!
//! ```rust,ignore
//! use docsnap_util::timing::TimingGuard;
//!
//! fn compare(a: &Path, b: &Path) -> DiffResult {
//!     let _timing = TimingGuard::diff("paragraph");
//!     // ... alignment ...
//! }
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// RAII guard that logs the duration of an operation when dropped.
pub struct TimingGuard {
    /// Type of operation (e.g., "diff", "snapshot")
    operation_type: &'static str,
    /// Name of the specific operation (e.g., "paragraph", "restore")
    operation_name: String,
    start: Instant,
    /// Minimum duration to log at info level (below this uses debug)
    info_threshold_ms: u64,
    /// Minimum duration to log at warn level
    warn_threshold_ms: u64,
}

impl TimingGuard {
    /// Create a new timing guard.
    pub fn new(operation_type: &'static str, operation_name: impl Into<String>) -> Self {
        Self {
            operation_type,
            operation_name: operation_name.into(),
            start: Instant::now(),
            info_threshold_ms: 100,
            warn_threshold_ms: 5000,
        }
    }

    /// Create a timing guard for a diff strategy run.
    pub fn diff(strategy: impl Into<String>) -> Self {
        Self::new("diff", strategy)
    }

    /// Create a timing guard for a snapshot store operation.
    pub fn snapshot(operation: impl Into<String>) -> Self {
        Self::new("snapshot", operation)
    }

    /// Set the threshold for info-level logging (in milliseconds).
    pub fn with_info_threshold(mut self, ms: u64) -> Self {
        self.info_threshold_ms = ms;
        self
    }

    /// Set the threshold for warn-level logging (in milliseconds).
    pub fn with_warn_threshold(mut self, ms: u64) -> Self {
        self.warn_threshold_ms = ms;
        self
    }

    /// Get the elapsed time so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

fn format_duration(duration_ms: u128) -> String {
    if duration_ms < 1000 {
        format!("{duration_ms}ms")
    } else {
        format!("{:.2}s", duration_ms as f64 / 1000.0)
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_millis();
        let duration = format_duration(duration_ms);

        if duration_ms >= self.warn_threshold_ms as u128 {
            warn!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration = %duration,
                "Slow operation completed"
            );
        } else if duration_ms >= self.info_threshold_ms as u128 {
            info!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration = %duration,
                "Operation completed"
            );
        } else {
            debug!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration = %duration,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_timing_guard_elapsed() {
        let guard = TimingGuard::diff("paragraph");
        sleep(Duration::from_millis(10));
        assert!(guard.elapsed_ms() >= 10);
    }

    #[test]
    fn test_timing_guard_thresholds() {
        let guard = TimingGuard::snapshot("restore")
            .with_info_threshold(50)
            .with_warn_threshold(1000);
        sleep(Duration::from_millis(5));
        drop(guard);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12), "12ms");
        assert_eq!(format_duration(2500), "2.50s");
    }
}
