// crates/policy-helm-sync/src/notifier/channel.rs
// ============================================================================
// Module: Channel Notifier
// Description: Notifier forwarding targets over an mpsc channel.
// Purpose: Observe fan-out delivery order and content in tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`ChannelNotifier`] sends every notified target into an `mpsc` channel.
//! Delivery fails closed when the receiving side has been dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::mpsc::Sender;

use crate::notifier::Notifier;
use crate::notifier::NotifyError;
use crate::target::SyncTarget;

// ============================================================================
// SECTION: Channel Notifier
// ============================================================================

/// Notifier forwarding targets into a channel.
///
/// # Invariants
/// - A dropped receiver turns every delivery into a failure.
pub struct ChannelNotifier {
    /// Sending half guarded for shared use across fan-out threads.
    sender: Mutex<Sender<SyncTarget>>,
}

impl ChannelNotifier {
    /// Creates a notifier around the sending half of a channel.
    #[must_use]
    pub const fn new(sender: Mutex<Sender<SyncTarget>>) -> Self {
        Self {
            sender,
        }
    }

    /// Creates a notifier from a bare sender.
    #[must_use]
    pub fn from_sender(sender: Sender<SyncTarget>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, target: &SyncTarget) -> Result<(), NotifyError> {
        let sender = self
            .sender
            .lock()
            .map_err(|_poisoned| NotifyError::Delivery("notifier lock poisoned".to_string()))?;
        sender
            .send(target.clone())
            .map_err(|_dropped| NotifyError::Delivery("notification receiver dropped".to_string()))
    }
}
