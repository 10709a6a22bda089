// crates/policy-helm-sync/src/notifier/mod.rs
// ============================================================================
// Module: Notifiers
// Description: Notifier trait and reference implementations.
// Purpose: Deliver one re-pull signal to one enforcement agent.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`Notifier`] delivers a single re-pull signal to a [`SyncTarget`].
//! The HTTP notifier is the production path; callback and channel notifiers
//! exist for wiring and tests. Implementations must fail closed on delivery
//! errors and must bound their own call duration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::target::SyncTarget;

// ============================================================================
// SECTION: Notify Errors
// ============================================================================

/// Errors emitted by notifiers.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// Target endpoint failed validation.
    #[error("invalid sync endpoint: {0}")]
    InvalidEndpoint(String),
    /// Delivery failed (network error or non-success status).
    #[error("sync delivery failed: {0}")]
    Delivery(String),
}

// ============================================================================
// SECTION: Notifier Trait
// ============================================================================

/// Delivers one re-pull signal to one target.
pub trait Notifier: Send + Sync {
    /// Notifies the target that it should re-pull its rule set.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails.
    fn notify(&self, target: &SyncTarget) -> Result<(), NotifyError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod callback;
pub mod channel;
pub mod http;

pub use callback::CallbackNotifier;
pub use channel::ChannelNotifier;
pub use http::HttpNotifier;
