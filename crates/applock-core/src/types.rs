//! Domain types for the app-lock feature

use thiserror::Error;

/// Default dormancy timeout: 1 minute.
pub const DEFAULT_TIMEOUT_MILLIS: i64 = 60 * 1000;

/// Configuration settings for app lock.
///
/// Immutable value object; replaced wholesale on every settings change.
/// Owned by the config repository — the core only reads a snapshot per
/// decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppLockConfig {
    /// Whether biometric/device-credential locking is enabled.
    pub enabled: bool,

    /// Timeout in milliseconds after which re-authentication is required
    /// when the app returns from background. 0 means immediate re-auth.
    pub timeout_millis: i64,
}

impl Default for AppLockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
        }
    }
}

impl AppLockConfig {
    pub fn new(enabled: bool, timeout_millis: i64) -> Self {
        Self {
            enabled,
            timeout_millis,
        }
    }

    /// Copy of this config with the enabled flag cleared.
    ///
    /// Used by the coordinator's auto-disable path when authentication
    /// availability is lost while the feature is on.
    pub fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

/// Authentication error types surfaced by an authenticator attempt.
///
/// These are data, not control flow: they travel inside [`AppLockResult`]
/// and [`AppLockState::Failed`], never as panics or infra errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppLockError {
    /// Device authentication is not available on this device.
    #[error("device authentication is not available")]
    NotAvailable,

    /// No biometric or device credentials are enrolled.
    #[error("no biometric or device credentials enrolled")]
    NotEnrolled,

    /// Authentication attempt failed.
    #[error("authentication failed")]
    Failed,

    /// User explicitly canceled the authentication dialog.
    #[error("authentication canceled by user")]
    Canceled,

    /// Authentication was interrupted by the system (backgrounding,
    /// configuration change). Retried silently, never shown to the user.
    #[error("authentication interrupted by the system")]
    Interrupted,

    /// Too many failed attempts; user is temporarily locked out.
    #[error("locked out for {duration_seconds}s")]
    Lockout {
        /// Lockout duration in seconds, or 0 if unknown.
        duration_seconds: u32,
    },

    /// The authentication prompt could not be started.
    #[error("unable to start authentication: {message}")]
    UnableToStart { message: String },
}

impl AppLockError {
    pub fn unable_to_start(message: impl Into<String>) -> Self {
        Self::UnableToStart {
            message: message.into(),
        }
    }

    /// Whether the UI may offer a retry for this error.
    ///
    /// `NotAvailable`/`NotEnrolled`/`Lockout` need external action (enroll,
    /// wait out the lockout, disable the feature); `Canceled` exits the app.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppLockError::Failed | AppLockError::Interrupted | AppLockError::UnableToStart { .. }
        )
    }
}

/// Outcome of a single authentication attempt.
pub type AppLockResult = Result<(), AppLockError>;

/// Unified state for the app-lock feature.
///
/// Exactly one variant is active at a time; transitions happen only through
/// [`AppLockPolicy::reduce`](crate::policy::AppLockPolicy::reduce). Never
/// persisted — process death always re-locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppLockState {
    /// Lock feature off or unavailable; content is always accessible.
    Disabled,

    /// Lock engaged, no prompt in flight yet.
    Locked,

    /// An authentication prompt is in flight.
    Unlocking {
        /// Correlates this attempt with its eventual result; stale results
        /// from superseded attempts are discarded by the policy.
        attempt_id: u64,
    },

    /// User has successfully authenticated.
    Unlocked {
        /// Timestamp of the background transition, or `None` while visible.
        /// Read on the next foreground to compute elapsed dormancy.
        last_hidden_at_millis: Option<i64>,
    },

    /// Last attempt failed with a terminal-for-now error; awaiting retry or
    /// external action.
    Failed { error: AppLockError },
}

impl AppLockState {
    /// Fresh unlocked state with no hide timestamp.
    pub fn unlocked() -> Self {
        Self::Unlocked {
            last_hidden_at_millis: None,
        }
    }

    /// App content is accessible (authenticated or lock disabled).
    pub fn is_unlocked(&self) -> bool {
        matches!(
            self,
            AppLockState::Unlocked { .. } | AppLockState::Disabled
        )
    }

    /// A lock screen is required (lock engaged, prompting, or failed).
    pub fn requires_lock_screen(&self) -> bool {
        !self.is_unlocked()
    }
}
