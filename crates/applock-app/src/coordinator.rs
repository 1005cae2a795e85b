//! App-lock coordinator - owns live state and sequences events
//!
//! State is managed in-memory and never persisted: process death always
//! requires re-authentication when app lock is enabled. The dormancy timeout
//! only applies to background-to-foreground transitions within the same
//! process.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use applock_core::prelude::*;
use applock_core::{
    AppLockAuthenticator, AppLockAvailability, AppLockConfig, AppLockConfigRepository,
    AppLockEffect, AppLockError, AppLockEvent, AppLockPolicy, AppLockResult, AppLockState,
    SharedClock,
};

/// Effects are fire-and-forget: buffer depth 1, no replay. A late subscriber
/// re-derives what to show from the current state instead.
const EFFECT_CHANNEL_CAPACITY: usize = 1;

/// Mutable fields serialized behind the coordinator's transition lock.
#[derive(Debug)]
struct Inner {
    /// Monotonically increasing attempt-id counter. Minted here, never by
    /// the policy; stale results are matched against the minted id.
    next_attempt_id: u64,
    in_foreground: bool,
}

/// Coordinates the app-lock flow: settings, availability, state, and
/// authentication.
///
/// All state transitions go through the policy reducer inside a serialized
/// read-modify-write section. The only awaiting operation is
/// [`authenticate`](Self::authenticate), which never holds the transition
/// lock across the await; the policy's attempt-id check is what keeps
/// concurrent lifecycle events consistent with an in-flight prompt.
pub struct AppLockCoordinator {
    repository: Arc<dyn AppLockConfigRepository>,
    availability: Arc<dyn AppLockAvailability>,
    policy: AppLockPolicy,
    state_tx: watch::Sender<AppLockState>,
    effects_tx: broadcast::Sender<AppLockEffect>,
    inner: Mutex<Inner>,
}

impl AppLockCoordinator {
    /// Build a coordinator and seed its state from the current config and
    /// availability (via a `SettingsChanged` reduction).
    pub fn new(
        repository: Arc<dyn AppLockConfigRepository>,
        availability: Arc<dyn AppLockAvailability>,
        clock: SharedClock,
    ) -> Self {
        let policy = AppLockPolicy::new(clock);

        let config = repository.get_config();
        let biometric_available = availability.is_authentication_available();
        let initial = policy.reduce(
            &AppLockState::Disabled,
            AppLockEvent::SettingsChanged {
                config,
                biometric_available,
            },
        );
        debug!(state = ?initial, "app lock coordinator initialized");

        let (state_tx, _) = watch::channel(initial);
        let (effects_tx, _) = broadcast::channel(EFFECT_CHANNEL_CAPACITY);

        Self {
            repository,
            availability,
            policy,
            state_tx,
            effects_tx,
            inner: Mutex::new(Inner {
                next_attempt_id: 0,
                in_foreground: false,
            }),
        }
    }

    /// Snapshot of the current lock state.
    pub fn state(&self) -> AppLockState {
        self.state_tx.borrow().clone()
    }

    /// Observe lock state changes for UI rendering.
    pub fn watch_state(&self) -> watch::Receiver<AppLockState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to one-shot effects. Effects emitted before subscription
    /// are not replayed.
    pub fn subscribe_effects(&self) -> broadcast::Receiver<AppLockEffect> {
        self.effects_tx.subscribe()
    }

    /// Current app-lock configuration.
    pub fn config(&self) -> AppLockConfig {
        self.repository.get_config()
    }

    /// Whether app lock is currently enabled in settings.
    pub fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    /// Whether biometric/device-credential authentication is available.
    pub fn is_authentication_available(&self) -> bool {
        self.availability.is_authentication_available()
    }

    /// Notify that the app came to the foreground.
    pub fn on_foregrounded(&self) {
        let mut inner = self.lock_inner();
        inner.in_foreground = true;

        let config = self.repository.get_config();
        let biometric_available = self.availability.is_authentication_available();

        // Auto-disable if authentication became unavailable. The one
        // sanctioned side effect outside the policy; the settings path
        // deliberately does not do this.
        if config.enabled && !biometric_available {
            warn!("authentication no longer available, disabling app lock");
            self.repository.set_config(config.disabled());
        }

        self.apply(AppLockEvent::AppForegrounded {
            config: self.repository.get_config(),
            biometric_available,
        });

        // The coordinator, not the policy, decides to prompt.
        self.request_unlock_if_lockable(&mut inner);
        self.emit_lock_screen_if_unlocking();
    }

    /// Notify that the app went to the background.
    pub fn on_backgrounded(&self) {
        let mut inner = self.lock_inner();
        inner.in_foreground = false;
        self.apply(AppLockEvent::AppBackgrounded);
    }

    /// Update the app-lock configuration.
    pub fn on_settings_changed(&self, config: AppLockConfig) {
        let mut inner = self.lock_inner();
        self.repository.set_config(config);

        self.apply(AppLockEvent::SettingsChanged {
            config,
            biometric_available: self.availability.is_authentication_available(),
        });

        if inner.in_foreground {
            self.request_unlock_if_lockable(&mut inner);
            self.emit_lock_screen_if_unlocking();
        }
    }

    /// Authenticate using the provided authenticator.
    ///
    /// Called by the UI when observing [`AppLockState::Unlocking`]; the
    /// coordinator has already minted the attempt id. Fails with
    /// `UnableToStart` without invoking the authenticator when no attempt is
    /// in flight. Waits indefinitely for a terminal result; dropping the
    /// future cancels the wait, and the authenticator is responsible for
    /// cancelling the underlying platform prompt.
    pub async fn authenticate<A: AppLockAuthenticator>(&self, authenticator: &A) -> AppLockResult {
        let attempt_id = match self.state() {
            AppLockState::Unlocking { attempt_id } => attempt_id,
            state => {
                debug!(?state, "authenticate called outside Unlocking");
                return Err(AppLockError::unable_to_start("Not in Unlocking state"));
            }
        };

        // Awaited without holding the transition lock: lifecycle events that
        // arrive mid-prompt still apply, and the attempt-id check discards
        // this result if it was superseded.
        let result = authenticator.authenticate().await;

        self.on_auth_result(attempt_id, result.clone());

        if matches!(result, Err(AppLockError::Canceled)) {
            self.emit(AppLockEffect::ExitApp);
        }

        result
    }

    /// Retry authentication after a failure.
    ///
    /// No-op unless the current state is [`AppLockState::Failed`].
    pub fn retry(&self) {
        let mut inner = self.lock_inner();
        if matches!(self.state(), AppLockState::Failed { .. }) {
            self.request_unlock_if_lockable(&mut inner);
        }
    }

    fn on_auth_result(&self, attempt_id: u64, result: AppLockResult) {
        let mut inner = self.lock_inner();
        let interrupted = matches!(result, Err(AppLockError::Interrupted));

        self.apply(AppLockEvent::AuthResult { attempt_id, result });

        // Interrupted while still foregrounded: re-request immediately so we
        // don't sit in Locked with no prompt on screen.
        if inner.in_foreground && interrupted {
            self.request_unlock_if_lockable(&mut inner);
            self.emit_lock_screen_if_unlocking();
        }
    }

    /// Mint a fresh attempt id and request an unlock when the state allows
    /// it (Locked or Failed).
    fn request_unlock_if_lockable(&self, inner: &mut Inner) {
        if matches!(
            self.state(),
            AppLockState::Locked | AppLockState::Failed { .. }
        ) {
            let attempt_id = inner.next_attempt_id;
            inner.next_attempt_id += 1;
            self.apply(AppLockEvent::UnlockRequested { attempt_id });
        }
    }

    fn emit_lock_screen_if_unlocking(&self) {
        if matches!(self.state(), AppLockState::Unlocking { .. }) {
            self.emit(AppLockEffect::LaunchLockScreen);
        }
    }

    fn emit(&self, effect: AppLockEffect) {
        // Fire-and-forget: an effect with no subscribers is dropped, not
        // queued for replay.
        if self.effects_tx.send(effect).is_err() {
            debug!(?effect, "effect dropped, no subscribers");
        }
    }

    fn apply(&self, event: AppLockEvent) {
        self.state_tx.send_if_modified(|state| {
            let next = self.policy.reduce(state, event);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
