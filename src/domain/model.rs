use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Diagnostics from one successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub bytes: u64,
    pub elapsed: Duration,
    pub speed_kb_per_sec: u64,
}

impl CopyStats {
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        let elapsed_ms = elapsed.as_millis() as u64;
        let speed_kb_per_sec = if elapsed_ms > 0 {
            (bytes / 1024) * 1000 / elapsed_ms
        } else {
            0
        };
        Self {
            bytes,
            elapsed,
            speed_kb_per_sec,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy always makes at least one attempt.
    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Disposal,
    Staging,
}

/// Outcome of a leak probe run. Leak detection itself is left to whoever
/// watches the process; the report only carries what was observable in-process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub kind: ProbeKind,
    pub asset: String,
    pub iterations_requested: usize,
    pub iterations_completed: usize,
    pub last_scalar: Option<i64>,
    pub fds_before: Option<usize>,
    pub fds_after: Option<usize>,
    pub peak_memory_mb: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl ProbeReport {
    /// Descriptors still open after the run that were not open before it.
    pub fn fd_growth(&self) -> Option<i64> {
        match (self.fds_before, self.fds_after) {
            (Some(before), Some(after)) => Some(after as i64 - before as i64),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.iterations_completed == self.iterations_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_zero_when_copy_is_instant() {
        let stats = CopyStats::new(4096, Duration::from_micros(200));
        assert_eq!(stats.speed_kb_per_sec, 0);
    }

    #[test]
    fn speed_uses_whole_kilobytes_per_second() {
        let stats = CopyStats::new(10 * 1024, Duration::from_millis(500));
        assert_eq!(stats.speed_kb_per_sec, 20);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.effective_attempts(), 1);
    }

    #[test]
    fn fd_growth_needs_both_samples() {
        let mut report = ProbeReport {
            kind: ProbeKind::Staging,
            asset: "a.anki2".to_string(),
            iterations_requested: 3,
            iterations_completed: 3,
            last_scalar: None,
            fds_before: Some(10),
            fds_after: Some(12),
            peak_memory_mb: None,
            started_at: Utc::now(),
            elapsed_ms: 0,
        };
        assert_eq!(report.fd_growth(), Some(2));
        assert!(report.is_complete());

        report.fds_after = None;
        assert_eq!(report.fd_growth(), None);
    }
}
