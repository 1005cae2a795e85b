//! Events driving the lock state machine, and one-shot UI effects

use crate::types::{AppLockConfig, AppLockResult};

/// Inputs consumed by the policy reducer.
///
/// Events are ephemeral: they exist for the duration of a single
/// `reduce` call and are never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum AppLockEvent {
    /// App entered foreground; evaluate whether auth is required.
    AppForegrounded {
        config: AppLockConfig,
        biometric_available: bool,
    },

    /// App went to background.
    AppBackgrounded,

    /// App-lock settings changed.
    SettingsChanged {
        config: AppLockConfig,
        biometric_available: bool,
    },

    /// Unlock flow was requested (prompt launch). The attempt id is minted
    /// by the coordinator, never by the policy.
    UnlockRequested { attempt_id: u64 },

    /// Authentication completed.
    AuthResult {
        attempt_id: u64,
        result: AppLockResult,
    },
}

/// One-shot directives from the coordinator to the UI layer.
///
/// Delivered at-most-once per occurrence over a broadcast channel with no
/// replay: late subscribers must re-derive what to show from current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLockEffect {
    /// Launch the lock screen to authenticate.
    LaunchLockScreen,

    /// Exit the app (user canceled authentication).
    ExitApp,
}
