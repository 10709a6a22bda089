// crates/policy-helm-admin/src/lib.rs
// ============================================================================
// Module: Policy Helm Admin
// Description: Lifecycle coordination, response envelopes, and audit hooks.
// Purpose: Orchestrate policy mutations and normalize every outcome.
// Dependencies: policy-helm-core, policy-helm-sync, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The admin crate hosts the only component allowed to mutate policy state:
//! [`LifecycleCoordinator`] composes the store seam, the metadata
//! inferencer, and the sync trigger, and owns the path/namespace invariant.
//! [`ApiEnvelope`] normalizes every outcome (success and failure) into one
//! response shape, and [`AuditLog`] captures the internal detail that is
//! never echoed to callers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod coordinator;
pub mod envelope;

pub use audit::AuditEvent;
pub use audit::AuditLog;
pub use audit::NoopAudit;
pub use audit::WriterAudit;
pub use coordinator::LifecycleCoordinator;
pub use coordinator::LifecycleCoordinatorBuilder;
pub use coordinator::LifecycleError;
pub use coordinator::MutationReceipt;
pub use envelope::ApiEnvelope;
pub use envelope::EnvelopeStatus;
pub use envelope::ErrorBody;
pub use envelope::RequestInfo;
pub use envelope::SyncWarning;
pub use envelope::error_status;
