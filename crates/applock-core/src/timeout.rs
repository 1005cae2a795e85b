//! Dormancy timeout calculation

use crate::clock::SharedClock;

/// Decides whether a backgrounded session has been dormant long enough to
/// require re-authentication.
///
/// `last_hidden_millis == 0` is the sentinel for "never hidden" and never
/// exceeds the timeout.
#[derive(Clone)]
pub struct TimeoutCalculator {
    clock: SharedClock,
}

impl TimeoutCalculator {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Check whether the timeout period has elapsed since the UI was hidden.
    ///
    /// Boundary-inclusive: an elapsed time of exactly `timeout_millis`
    /// counts as exceeded.
    pub fn is_timeout_exceeded(&self, last_hidden_millis: i64, timeout_millis: i64) -> bool {
        if last_hidden_millis == 0 {
            return false;
        }

        let elapsed = self.clock.now_millis() - last_hidden_millis;
        elapsed >= timeout_millis
    }

    /// Remaining time until the timeout, in milliseconds.
    ///
    /// Returns 0 when never hidden or already timed out; never negative.
    pub fn remaining_millis(&self, last_hidden_millis: i64, timeout_millis: i64) -> i64 {
        if last_hidden_millis == 0 {
            return 0;
        }

        let elapsed = self.clock.now_millis() - last_hidden_millis;
        (timeout_millis - elapsed).max(0)
    }
}
