// crates/policy-helm-sync/src/lib.rs
// ============================================================================
// Module: Policy Helm Sync
// Description: Re-pull notification fan-out for enforcement agents.
// Purpose: Tell every registered agent to refresh its rule set after a mutation.
// Dependencies: reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! After every successful policy mutation the control plane notifies its
//! fleet of enforcement agents to re-pull from the engine. [`SyncTrigger`]
//! fans the signal out with bounded concurrency and gathers one outcome per
//! target; a failure on one target never blocks or fails the others, and the
//! aggregate is reported as a non-fatal warning by callers.
//! Invariants:
//! - No retries; each notifier call carries its own bounded timeout.
//! - Report entries preserve target order regardless of completion order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod notifier;
pub mod target;
pub mod trigger;

pub use notifier::CallbackNotifier;
pub use notifier::ChannelNotifier;
pub use notifier::HttpNotifier;
pub use notifier::Notifier;
pub use notifier::NotifyError;
pub use target::SyncTarget;
pub use trigger::SyncReport;
pub use trigger::SyncTrigger;
pub use trigger::TargetFailure;
