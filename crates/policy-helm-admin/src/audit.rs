// crates/policy-helm-admin/src/audit.rs
// ============================================================================
// Module: Audit Hooks
// Description: Observability events for lifecycle operations.
// Purpose: Capture tolerated failures and internal detail without hard deps.
// ============================================================================

//! ## Overview
//! This module exposes a thin audit interface for lifecycle events. It is
//! intentionally dependency-light so downstream deployments can plug in
//! their own pipeline without redesign. Events carry the internal detail
//! (engine bodies, tolerated failures) that response envelopes deliberately
//! withhold from callers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use policy_helm_core::PolicyStatus;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Lifecycle audit event payload.
///
/// # Invariants
/// - Variants are stable for downstream consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A mutation completed successfully.
    MutationApplied {
        /// Operation label (create, update, enable, disable, delete).
        operation: String,
        /// Policy identifier.
        id: String,
        /// Resulting status when the operation has one.
        status: Option<PolicyStatus>,
    },
    /// The delete step of a move failed after the new copy was written.
    MoveCleanupFailed {
        /// Policy identifier.
        id: String,
        /// Storage path still holding the stale copy.
        stale_path: String,
        /// Failure detail.
        detail: String,
    },
    /// A policy id was found under both status folders.
    DuplicatePathsDetected {
        /// Policy identifier.
        id: String,
        /// Paths holding copies of the policy.
        paths: Vec<String>,
    },
    /// A sync fan-out had at least one failed target.
    SyncPartialFailure {
        /// Operation that triggered the fan-out.
        operation: String,
        /// Number of targets that failed.
        failed_count: usize,
    },
    /// Internal error detail withheld from the caller-visible response.
    InternalError {
        /// Operation or call site context.
        context: String,
        /// Full internal detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for lifecycle audit events.
pub trait AuditLog: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: AuditEvent);
}

/// No-op audit sink.
///
/// # Invariants
/// - Events are intentionally discarded.
pub struct NoopAudit;

impl AuditLog for NoopAudit {
    fn record(&self, _event: AuditEvent) {}
}

// ============================================================================
// SECTION: Writer Audit
// ============================================================================

/// Audit sink emitting one JSON line per event.
///
/// # Invariants
/// - Write failures are swallowed; auditing is best-effort and must never
///   fail an operation.
pub struct WriterAudit<W: Write + Send> {
    /// Guarded output stream.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterAudit<W> {
    /// Creates an audit sink around a writer.
    #[must_use]
    pub const fn new(writer: Mutex<W>) -> Self {
        Self {
            writer,
        }
    }

    /// Creates an audit sink from a bare writer.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> AuditLog for WriterAudit<W> {
    fn record(&self, event: AuditEvent) {
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            writeln!(writer, "{line}").ok();
        }
    }
}
