//! Submission ordering: last submission wins the display.

use crate::Submission;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Hands out monotonically increasing submission numbers.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    latest: AtomicU64,
}

impl SubmissionTracker {
    /// Tracker whose first submission is number 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new submission and returns its number.
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of the most recent submission, 0 if none yet.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// True if no newer submission has been registered.
    pub fn is_current(&self, sequence: u64) -> bool {
        self.latest() == sequence
    }
}

/// The result currently on display.
///
/// Only the newest submission may write here; results that resolve after a
/// newer submission was made are dropped.
#[derive(Debug)]
pub struct LatestResult {
    tracker: Arc<SubmissionTracker>,
    current: Mutex<Option<Submission>>,
}

impl LatestResult {
    /// Display slot guarded by `tracker`.
    pub fn new(tracker: Arc<SubmissionTracker>) -> Self {
        Self {
            tracker,
            current: Mutex::new(None),
        }
    }

    /// Stores `submission` if it is still the latest. Returns whether it was stored.
    pub fn apply(&self, submission: Submission) -> bool {
        let mut current = self.current.lock();
        if !self.tracker.is_current(*submission.sequence()) {
            debug!(
                sequence = submission.sequence(),
                latest = self.tracker.latest(),
                "Discarding stale submission result"
            );
            return false;
        }
        *current = Some(submission);
        true
    }

    /// Currently displayed submission.
    pub fn get(&self) -> Option<Submission> {
        self.current.lock().clone()
    }

    /// Clears the display.
    pub fn clear(&self) {
        *self.current.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_increase() {
        let tracker = SubmissionTracker::new();
        assert_eq!(tracker.latest(), 0);
        assert_eq!(tracker.next(), 1);
        assert_eq!(tracker.next(), 2);
        assert!(tracker.is_current(2));
        assert!(!tracker.is_current(1));
    }
}
