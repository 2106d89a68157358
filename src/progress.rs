//! Cooperative progress reporting for long-running quantization passes.
//!
//! Every quantizer in this crate is exposed as a forward-only stepper
//! (an [`Iterator`] over [`QuantizeStep`]). The stepper runs the underlying
//! computation in slices: each `next()` call advances until the internal
//! [`ProgressTracker`] decides a notification is due, then yields
//! [`QuantizeStep::Progress`]. The final call yields [`QuantizeStep::Done`]
//! with the result and the iterator is exhausted afterwards.
//!
//! The tracker throttles notifications so that an input of any size produces
//! at most ~100 of them. Progress values before completion are capped at 99;
//! `Done` represents 100.

/// One step of a cooperative quantization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeStep<T> {
    /// The computation is still running; the payload is percent complete,
    /// in `0..=99`.
    Progress(u8),
    /// The computation finished and produced its result.
    Done(T),
}

impl<T> QuantizeStep<T> {
    /// Returns the result if this step is `Done`.
    pub fn into_done(self) -> Option<T> {
        match self {
            QuantizeStep::Progress(_) => None,
            QuantizeStep::Done(value) => Some(value),
        }
    }
}

/// Throttles progress notifications over a known iteration range.
///
/// The tracker divides the range into ~100 steps of at least one iteration
/// each. `should_notify` returns `true` at most once per step; the first
/// call (index 0) always notifies.
#[derive(Debug)]
pub struct ProgressTracker {
    range: usize,
    progress_range: u8,
    step: usize,
    last: i64,
    progress: u8,
}

impl ProgressTracker {
    const STEPS: usize = 100;

    /// Creates a tracker over `range` iterations reporting progress in
    /// `0..=progress_range`.
    pub fn new(range: usize, progress_range: u8) -> Self {
        let step = (range / (Self::STEPS + 1)).max(1);
        Self {
            range,
            progress_range,
            step,
            last: -(step as i64),
            progress: 0,
        }
    }

    /// Returns `true` when a notification is due for iteration `current`,
    /// updating the reported progress value as a side effect.
    pub fn should_notify(&mut self, current: usize) -> bool {
        if current as i64 - self.last >= self.step as i64 {
            self.last = current as i64;
            self.progress = if self.range == 0 {
                0
            } else {
                let raw = self.progress_range as f64 * self.last as f64 / self.range as f64;
                raw.min(self.progress_range as f64) as u8
            };
            return true;
        }
        false
    }

    /// The most recently computed progress value.
    pub fn progress(&self) -> u8 {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_iteration_always_notifies() {
        let mut tracker = ProgressTracker::new(1000, 99);
        assert!(tracker.should_notify(0));
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_small_range_notifies_every_iteration() {
        // range below 101 gives step 1
        let mut tracker = ProgressTracker::new(10, 99);
        for i in 0..10 {
            assert!(tracker.should_notify(i), "iteration {i}");
        }
    }

    #[test]
    fn test_large_range_caps_notification_count() {
        let mut tracker = ProgressTracker::new(1_000_000, 99);
        let notifications = (0..1_000_000)
            .filter(|&i| tracker.should_notify(i))
            .count();
        assert!(notifications <= 102, "got {notifications} notifications");
    }

    #[test]
    fn test_progress_never_exceeds_range() {
        let mut tracker = ProgressTracker::new(50, 99);
        let mut max = 0;
        for i in 0..50 {
            if tracker.should_notify(i) {
                max = max.max(tracker.progress());
            }
        }
        assert!(max <= 99, "progress reached {max}");
    }

    #[test]
    fn test_zero_range_does_not_divide_by_zero() {
        let mut tracker = ProgressTracker::new(0, 99);
        assert!(tracker.should_notify(0));
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_into_done() {
        assert_eq!(QuantizeStep::<u32>::Progress(50).into_done(), None);
        assert_eq!(QuantizeStep::Done(7u32).into_done(), Some(7));
    }
}
