//! Lock policy - the pure state-transition function
//!
//! Policy summary:
//! - Foreground resumes do not force auth unless the app was backgrounded
//!   and the dormancy timeout elapsed.
//! - Settings changes always fully re-evaluate lock necessity, discarding
//!   any in-flight attempt.
//! - Attempt ids are minted by the coordinator; the policy only matches
//!   results against the id of the attempt currently in flight.

use tracing::trace;

use crate::clock::SharedClock;
use crate::events::AppLockEvent;
use crate::timeout::TimeoutCalculator;
use crate::types::{AppLockError, AppLockState};

/// Reducer for app-lock state transitions.
///
/// `reduce` is total: every (state, event) pair maps to a next state, no
/// side effects beyond reading the injected clock through the timeout
/// calculator.
#[derive(Clone)]
pub struct AppLockPolicy {
    calculator: TimeoutCalculator,
    clock: SharedClock,
}

impl AppLockPolicy {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            calculator: TimeoutCalculator::new(clock.clone()),
            clock,
        }
    }

    /// Compute the next state for an incoming event.
    pub fn reduce(&self, state: &AppLockState, event: AppLockEvent) -> AppLockState {
        let next = match event {
            AppLockEvent::SettingsChanged {
                config,
                biometric_available,
            } => {
                if !config.enabled || !biometric_available {
                    AppLockState::Disabled
                } else {
                    AppLockState::Locked
                }
            }

            AppLockEvent::AppBackgrounded => match state {
                // Only an unlocked session needs a hide timestamp.
                AppLockState::Unlocked { .. } => AppLockState::Unlocked {
                    last_hidden_at_millis: Some(self.clock.now_millis()),
                },
                other => other.clone(),
            },

            AppLockEvent::AppForegrounded {
                config,
                biometric_available,
            } => {
                if !config.enabled || !biometric_available {
                    // Availability loss disables the lock even mid-flow.
                    AppLockState::Disabled
                } else {
                    match state {
                        AppLockState::Disabled => AppLockState::Locked,
                        AppLockState::Locked
                        | AppLockState::Unlocking { .. }
                        | AppLockState::Failed { .. } => state.clone(),
                        AppLockState::Unlocked {
                            last_hidden_at_millis,
                        } => match last_hidden_at_millis {
                            // Never hidden - stays unlocked.
                            None => state.clone(),
                            Some(hidden_at) => {
                                if self
                                    .calculator
                                    .is_timeout_exceeded(*hidden_at, config.timeout_millis)
                                {
                                    AppLockState::Locked
                                } else {
                                    AppLockState::unlocked()
                                }
                            }
                        },
                    }
                }
            }

            AppLockEvent::UnlockRequested { attempt_id } => match state {
                AppLockState::Locked | AppLockState::Failed { .. } => {
                    AppLockState::Unlocking { attempt_id }
                }
                // Disabled never unlocks via this path; Unlocking/Unlocked
                // are idempotent against duplicate requests.
                other => other.clone(),
            },

            AppLockEvent::AuthResult { attempt_id, result } => match state {
                AppLockState::Unlocking {
                    attempt_id: current,
                } if *current == attempt_id => match result {
                    Ok(()) => AppLockState::unlocked(),
                    // System interruptions (rotation, backgrounding) are
                    // transparent to the user: back to Locked, no error shown.
                    Err(AppLockError::Interrupted) => AppLockState::Locked,
                    Err(error) => AppLockState::Failed { error },
                },
                // Stale result from a superseded attempt, or no attempt in
                // flight at all - discarded.
                other => other.clone(),
            },
        };

        if next != *state {
            trace!(from = ?state, to = ?next, "app lock transition");
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::AppLockConfig;

    fn policy_at(now: i64) -> AppLockPolicy {
        AppLockPolicy::new(ManualClock::new(now))
    }

    fn enabled_config() -> AppLockConfig {
        AppLockConfig::new(true, 60_000)
    }

    fn foregrounded(config: AppLockConfig, available: bool) -> AppLockEvent {
        AppLockEvent::AppForegrounded {
            config,
            biometric_available: available,
        }
    }

    fn settings_changed(config: AppLockConfig, available: bool) -> AppLockEvent {
        AppLockEvent::SettingsChanged {
            config,
            biometric_available: available,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // SettingsChanged
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn test_settings_enabled_and_available_locks() {
        let policy = policy_at(0);
        let next = policy.reduce(
            &AppLockState::Disabled,
            settings_changed(enabled_config(), true),
        );
        assert_eq!(next, AppLockState::Locked);
    }

    #[test]
    fn test_settings_disabled_collapses_to_disabled() {
        let policy = policy_at(0);
        let next = policy.reduce(
            &AppLockState::Locked,
            settings_changed(AppLockConfig::default(), true),
        );
        assert_eq!(next, AppLockState::Disabled);
    }

    #[test]
    fn test_settings_unavailable_collapses_to_disabled() {
        let policy = policy_at(0);
        let next = policy.reduce(
            &AppLockState::Locked,
            settings_changed(enabled_config(), false),
        );
        assert_eq!(next, AppLockState::Disabled);
    }

    #[test]
    fn test_settings_discards_in_flight_attempt() {
        // Any prior Unlocking/Failed/Unlocked context collapses to exactly
        // Disabled or Locked.
        let policy = policy_at(0);
        let priors = [
            AppLockState::Unlocking { attempt_id: 7 },
            AppLockState::Failed {
                error: AppLockError::Failed,
            },
            AppLockState::Unlocked {
                last_hidden_at_millis: Some(123),
            },
        ];

        for prior in &priors {
            let next = policy.reduce(prior, settings_changed(enabled_config(), true));
            assert_eq!(next, AppLockState::Locked, "from {prior:?}");

            let next = policy.reduce(prior, settings_changed(enabled_config(), false));
            assert_eq!(next, AppLockState::Disabled, "from {prior:?}");
        }
    }

    // ─────────────────────────────────────────────────────────────
    // AppBackgrounded
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn test_backgrounded_stamps_hide_time_when_unlocked() {
        let policy = policy_at(1_000);
        let next = policy.reduce(&AppLockState::unlocked(), AppLockEvent::AppBackgrounded);
        assert_eq!(
            next,
            AppLockState::Unlocked {
                last_hidden_at_millis: Some(1_000)
            }
        );
    }

    #[test]
    fn test_backgrounded_restamps_already_hidden() {
        let policy = policy_at(5_000);
        let next = policy.reduce(
            &AppLockState::Unlocked {
                last_hidden_at_millis: Some(1_000),
            },
            AppLockEvent::AppBackgrounded,
        );
        assert_eq!(
            next,
            AppLockState::Unlocked {
                last_hidden_at_millis: Some(5_000)
            }
        );
    }

    #[test]
    fn test_backgrounded_ignored_in_other_states() {
        let policy = policy_at(1_000);
        for state in [
            AppLockState::Disabled,
            AppLockState::Locked,
            AppLockState::Unlocking { attempt_id: 3 },
            AppLockState::Failed {
                error: AppLockError::Canceled,
            },
        ] {
            let next = policy.reduce(&state, AppLockEvent::AppBackgrounded);
            assert_eq!(next, state);
        }
    }

    // ─────────────────────────────────────────────────────────────
    // AppForegrounded
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn test_foregrounded_availability_loss_disables_mid_flow() {
        let policy = policy_at(0);
        for state in [
            AppLockState::Locked,
            AppLockState::Unlocking { attempt_id: 1 },
            AppLockState::unlocked(),
        ] {
            let next = policy.reduce(&state, foregrounded(enabled_config(), false));
            assert_eq!(next, AppLockState::Disabled);
        }
    }

    #[test]
    fn test_foregrounded_re_engages_from_disabled() {
        let policy = policy_at(0);
        let next = policy.reduce(&AppLockState::Disabled, foregrounded(enabled_config(), true));
        assert_eq!(next, AppLockState::Locked);
    }

    #[test]
    fn test_foregrounded_no_redundant_retrigger() {
        // The coordinator, not the policy, mints a new attempt from
        // Locked/Failed.
        let policy = policy_at(0);
        for state in [
            AppLockState::Locked,
            AppLockState::Unlocking { attempt_id: 9 },
            AppLockState::Failed {
                error: AppLockError::Failed,
            },
        ] {
            let next = policy.reduce(&state, foregrounded(enabled_config(), true));
            assert_eq!(next, state);
        }
    }

    #[test]
    fn test_foregrounded_never_hidden_stays_unlocked() {
        let policy = policy_at(1_000_000);
        let next = policy.reduce(&AppLockState::unlocked(), foregrounded(enabled_config(), true));
        assert_eq!(next, AppLockState::unlocked());
    }

    #[test]
    fn test_foregrounded_timeout_exceeded_locks() {
        // hidden at 1000, back at 1000 + 60001 with a 60s timeout
        let policy = policy_at(61_001);
        let next = policy.reduce(
            &AppLockState::Unlocked {
                last_hidden_at_millis: Some(1_000),
            },
            foregrounded(enabled_config(), true),
        );
        assert_eq!(next, AppLockState::Locked);
    }

    #[test]
    fn test_foregrounded_within_timeout_clears_hide_time() {
        // hidden at 1000, back at 1000 + 30000
        let policy = policy_at(31_000);
        let next = policy.reduce(
            &AppLockState::Unlocked {
                last_hidden_at_millis: Some(1_000),
            },
            foregrounded(enabled_config(), true),
        );
        assert_eq!(next, AppLockState::unlocked());
    }

    #[test]
    fn test_foregrounded_exact_timeout_locks() {
        let policy = policy_at(61_000);
        let next = policy.reduce(
            &AppLockState::Unlocked {
                last_hidden_at_millis: Some(1_000),
            },
            foregrounded(enabled_config(), true),
        );
        assert_eq!(next, AppLockState::Locked);
    }

    // ─────────────────────────────────────────────────────────────
    // UnlockRequested
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn test_unlock_requested_from_locked_and_failed() {
        let policy = policy_at(0);
        let event = AppLockEvent::UnlockRequested { attempt_id: 4 };

        let next = policy.reduce(&AppLockState::Locked, event.clone());
        assert_eq!(next, AppLockState::Unlocking { attempt_id: 4 });

        let next = policy.reduce(
            &AppLockState::Failed {
                error: AppLockError::Failed,
            },
            event,
        );
        assert_eq!(next, AppLockState::Unlocking { attempt_id: 4 });
    }

    #[test]
    fn test_unlock_requested_ignored_elsewhere() {
        let policy = policy_at(0);
        for state in [
            AppLockState::Disabled,
            AppLockState::Unlocking { attempt_id: 2 },
            AppLockState::unlocked(),
        ] {
            let next = policy.reduce(&state, AppLockEvent::UnlockRequested { attempt_id: 8 });
            assert_eq!(next, state);
        }
    }

    // ─────────────────────────────────────────────────────────────
    // AuthResult
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn test_auth_success_unlocks() {
        let policy = policy_at(0);
        let next = policy.reduce(
            &AppLockState::Unlocking { attempt_id: 5 },
            AppLockEvent::AuthResult {
                attempt_id: 5,
                result: Ok(()),
            },
        );
        assert_eq!(next, AppLockState::unlocked());
    }

    #[test]
    fn test_stale_auth_result_discarded() {
        let policy = policy_at(0);
        let state = AppLockState::Unlocking { attempt_id: 5 };
        let next = policy.reduce(
            &state,
            AppLockEvent::AuthResult {
                attempt_id: 4,
                result: Ok(()),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_interrupted_returns_to_locked_without_error() {
        let policy = policy_at(0);
        let next = policy.reduce(
            &AppLockState::Unlocking { attempt_id: 5 },
            AppLockEvent::AuthResult {
                attempt_id: 5,
                result: Err(AppLockError::Interrupted),
            },
        );
        assert_eq!(next, AppLockState::Locked);
    }

    #[test]
    fn test_other_failures_land_in_failed() {
        let policy = policy_at(0);
        for error in [
            AppLockError::Failed,
            AppLockError::Canceled,
            AppLockError::NotEnrolled,
            AppLockError::Lockout {
                duration_seconds: 0,
            },
        ] {
            let next = policy.reduce(
                &AppLockState::Unlocking { attempt_id: 5 },
                AppLockEvent::AuthResult {
                    attempt_id: 5,
                    result: Err(error.clone()),
                },
            );
            assert_eq!(next, AppLockState::Failed { error });
        }
    }

    #[test]
    fn test_auth_result_ignored_outside_unlocking() {
        let policy = policy_at(0);
        for state in [
            AppLockState::Disabled,
            AppLockState::Locked,
            AppLockState::unlocked(),
            AppLockState::Failed {
                error: AppLockError::Failed,
            },
        ] {
            let next = policy.reduce(
                &state,
                AppLockEvent::AuthResult {
                    attempt_id: 1,
                    result: Ok(()),
                },
            );
            assert_eq!(next, state);
        }
    }
}
