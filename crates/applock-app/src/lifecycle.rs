//! Visibility event loop - maps platform lifecycle signals onto the
//! coordinator
//!
//! The platform's process-visibility notifier lives behind a channel rather
//! than a concrete lifecycle API: the host pushes [`VisibilityEvent`]s and
//! the loop forwards them, in order, to the coordinator.

use std::sync::Arc;

use tokio::sync::mpsc;

use applock_core::prelude::*;

use crate::coordinator::AppLockCoordinator;

/// Process-wide visibility transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// The app entered the foreground.
    Foregrounded,
    /// The app entered the background.
    Backgrounded,
}

/// Forward visibility events to the coordinator until the source closes.
///
/// Events apply in arrival order on this single task, which keeps lifecycle
/// notifications sequenced even while an `authenticate` call is pending
/// elsewhere.
pub async fn run_visibility_loop(
    coordinator: Arc<AppLockCoordinator>,
    mut events: mpsc::Receiver<VisibilityEvent>,
) {
    while let Some(event) = events.recv().await {
        trace!(?event, "visibility event");
        match event {
            VisibilityEvent::Foregrounded => coordinator.on_foregrounded(),
            VisibilityEvent::Backgrounded => coordinator.on_backgrounded(),
        }
    }
    debug!("visibility source closed, stopping loop");
}
