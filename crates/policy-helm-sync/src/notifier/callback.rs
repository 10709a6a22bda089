// crates/policy-helm-sync/src/notifier/callback.rs
// ============================================================================
// Module: Callback Notifier
// Description: Notifier delegating to a caller-provided closure.
// Purpose: Let embedders and tests intercept re-pull notifications.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`CallbackNotifier`] wraps a closure so embedders can observe or stub
//! notification delivery without an HTTP agent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::notifier::Notifier;
use crate::notifier::NotifyError;
use crate::target::SyncTarget;

// ============================================================================
// SECTION: Callback Notifier
// ============================================================================

/// Notifier delegating to a caller-provided closure.
pub struct CallbackNotifier<F>
where
    F: Fn(&SyncTarget) -> Result<(), NotifyError> + Send + Sync,
{
    /// Delivery closure.
    callback: F,
}

impl<F> CallbackNotifier<F>
where
    F: Fn(&SyncTarget) -> Result<(), NotifyError> + Send + Sync,
{
    /// Creates a notifier from a closure.
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self {
            callback,
        }
    }
}

impl<F> Notifier for CallbackNotifier<F>
where
    F: Fn(&SyncTarget) -> Result<(), NotifyError> + Send + Sync,
{
    fn notify(&self, target: &SyncTarget) -> Result<(), NotifyError> {
        (self.callback)(target)
    }
}
