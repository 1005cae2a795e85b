//! # applock-app - Coordinator and Orchestration
//!
//! Orchestration crate for the app-lock re-authentication gate. Composes the
//! pure policy from `applock-core` with the stateful pieces: the coordinator
//! that owns live state and mints attempt ids, the config repositories, and
//! the visibility event loop.
//!
//! ## Public API
//!
//! ### Coordinator (`coordinator`)
//! - [`AppLockCoordinator`] - Owns state, sequences events, drives
//!   authentication, emits one-shot effects over a broadcast channel
//!
//! ### Config Storage (`store`)
//! - [`TomlConfigRepository`] - TOML file persistence with
//!   defaults-on-missing behavior
//! - [`MemoryConfigRepository`] - In-memory repository for tests and
//!   embedding hosts
//!
//! ### Lifecycle (`lifecycle`)
//! - [`VisibilityEvent`] / [`run_visibility_loop`] - Channel-fed bridge from
//!   the platform's foreground/background notifier to the coordinator

pub mod coordinator;
pub mod lifecycle;
pub mod store;

pub use coordinator::AppLockCoordinator;
pub use lifecycle::{run_visibility_loop, VisibilityEvent};
pub use store::{MemoryConfigRepository, TomlConfigRepository};
