//! # applock-core - Core Domain Types and Lock Policy
//!
//! Foundation crate for the app-lock re-authentication gate. Provides the
//! domain model, the pure policy reducer, the timeout calculator, and the
//! collaborator contracts the orchestration layer depends on.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`AppLockConfig`] - Settings value object (enabled flag + dormancy timeout)
//! - [`AppLockState`] - Tagged lock state (Disabled, Locked, Unlocking, Unlocked, Failed)
//! - [`AppLockError`] - Typed authentication failures
//! - [`AppLockResult`] - `Result<(), AppLockError>` for a single attempt
//!
//! ### Events & Effects (`events`)
//! - [`AppLockEvent`] - Inputs consumed by the policy reducer
//! - [`AppLockEffect`] - One-shot UI directives (launch lock screen, exit app)
//!
//! ### Policy (`policy`, `timeout`, `clock`)
//! - [`AppLockPolicy`] - Total, pure `reduce(state, event) -> state`
//! - [`TimeoutCalculator`] - Boundary-inclusive dormancy timeout decisions
//! - [`Clock`] / [`SystemClock`] - Injectable millisecond time source
//!
//! ### Collaborator Contracts (`auth`)
//! - [`AppLockConfigRepository`] - Sync settings storage, last-write-wins
//! - [`AppLockAvailability`] - Platform capability query
//! - [`AppLockAuthenticator`] - Async per-attempt prompt contract
//!
//! ### Error Handling (`error`)
//! - [`Error`] / [`Result`] - Infra errors (config persistence, logging setup)
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use applock_core::prelude::*;
//! ```

pub mod auth;
pub mod clock;
pub mod error;
pub mod events;
pub mod logging;
pub mod policy;
pub mod timeout;
pub mod types;

/// Prelude for common imports used throughout the app-lock crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use auth::{AppLockAuthenticator, AppLockAvailability, AppLockConfigRepository};
pub use clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use error::{Error, Result, ResultExt};
pub use events::{AppLockEffect, AppLockEvent};
pub use policy::AppLockPolicy;
pub use timeout::TimeoutCalculator;
pub use types::{
    AppLockConfig, AppLockError, AppLockResult, AppLockState, DEFAULT_TIMEOUT_MILLIS,
};
