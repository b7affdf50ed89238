//! Process-wide delivery counters for admin notifications.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{NotificationError, NotificationOutcome};

static GLOBAL_STATS: Lazy<Arc<StatsTracker>> = Lazy::new(|| Arc::new(StatsTracker::new()));

/// Snapshot of the delivery counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailStats {
    pub sent: u64,
    pub failed: u64,
    /// Most recent failure only; older ones are not kept.
    pub last_error: Option<NotificationError>,
}

/// Counts delivered and failed admin notifications.
///
/// Only [`record`](Self::record) mutates the counters; callers get copies
/// through [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct StatsTracker {
    inner: Mutex<EmailStats>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker shared by the whole process.
    pub fn global() -> Arc<StatsTracker> {
        Arc::clone(&GLOBAL_STATS)
    }

    pub fn record(&self, outcome: &NotificationOutcome) {
        let mut stats = self.lock();
        match outcome {
            NotificationOutcome::Delivered => stats.sent += 1,
            NotificationOutcome::Failed(err) => {
                stats.failed += 1;
                stats.last_error = Some(err.clone());
            }
        }
    }

    pub fn snapshot(&self) -> EmailStats {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, EmailStats> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(StatsTracker::new().snapshot(), EmailStats::default());
    }

    #[test]
    fn counts_successes_and_failures() {
        let tracker = StatsTracker::new();
        for _ in 0..3 {
            tracker.record(&NotificationOutcome::Delivered);
        }
        tracker.record(&NotificationOutcome::Failed(NotificationError::QuotaExceeded));
        tracker.record(&NotificationOutcome::Failed(NotificationError::NotFound));

        let stats = tracker.snapshot();
        assert_eq!(stats.sent, 3);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.last_error, Some(NotificationError::NotFound));
    }

    #[test]
    fn success_does_not_clear_last_error() {
        let tracker = StatsTracker::new();
        tracker.record(&NotificationOutcome::Failed(NotificationError::Network));
        tracker.record(&NotificationOutcome::Delivered);
        assert_eq!(tracker.snapshot().last_error, Some(NotificationError::Network));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let tracker = StatsTracker::new();
        let mut copy = tracker.snapshot();
        copy.sent = 42;
        copy.last_error = Some(NotificationError::AccessDenied);
        assert_eq!(tracker.snapshot(), EmailStats::default());
    }

    #[test]
    fn concurrent_records_are_exact() {
        let tracker = Arc::new(StatsTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        if i % 2 == 0 {
                            tracker.record(&NotificationOutcome::Delivered);
                        } else {
                            tracker.record(&NotificationOutcome::Failed(NotificationError::Network));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = tracker.snapshot();
        assert_eq!(stats.sent, 400);
        assert_eq!(stats.failed, 400);
    }
}
