//! Collaborator contracts the coordinator depends on
//!
//! These are implemented by the host platform (settings storage, biometric
//! capability queries, the actual prompt) and injected into the coordinator.

use crate::types::{AppLockConfig, AppLockResult};

/// Storage for the app-lock configuration.
///
/// Synchronous, last-write-wins; no transaction semantics required. Both the
/// UI settings path and the coordinator's auto-disable path write through
/// the same repository so reads are always consistent with the latest write.
pub trait AppLockConfigRepository: Send + Sync {
    /// Snapshot of the current configuration.
    fn get_config(&self) -> AppLockConfig;

    /// Replace the configuration wholesale.
    fn set_config(&self, config: AppLockConfig);
}

/// Query for platform biometric/device-credential capability.
pub trait AppLockAvailability: Send + Sync {
    fn is_authentication_available(&self) -> bool;
}

/// A single authentication attempt against the platform prompt.
///
/// Supplied per-attempt by the caller of the coordinator's `authenticate`.
///
/// Implementations must map every platform condition into exactly one
/// [`AppLockError`](crate::types::AppLockError) variant:
/// - hardware absent/unavailable → `NotAvailable`
/// - nothing enrolled → `NotEnrolled`
/// - user cancel / negative button → `Canceled`
/// - system cancel (rotation, backgrounding) → `Interrupted`
/// - too many attempts → `Lockout` (duration, or 0 if unknown)
/// - generic failure / timeout / vendor error → `Failed`
/// - anything else, including failures while *starting* the prompt →
///   `UnableToStart(message)`
///
/// The future may wait indefinitely for a terminal platform event. If the
/// caller drops the future, the implementation is responsible for cancelling
/// the underlying platform prompt.
#[trait_variant::make(AppLockAuthenticator: Send)]
pub trait LocalAppLockAuthenticator {
    /// Run the prompt to completion and report the outcome.
    async fn authenticate(&self) -> AppLockResult;
}
