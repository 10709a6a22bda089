// crates/policy-helm-admin/src/envelope.rs
// ============================================================================
// Module: API Envelope
// Description: Uniform response envelope and lifecycle error classification.
// Purpose: Give HTTP frontends one stable success/error wire shape.
// Dependencies: policy-helm-core, policy-helm-sync, serde
// ============================================================================

//! ## Overview
//! Every lifecycle operation is reported to callers through one envelope
//! shape: `{status, message?, error?, request, data?, warning?}`. Errors are
//! classified into the HTTP status class a frontend should answer with;
//! internal detail stays in the audit trail and is never placed in an
//! envelope.
//! Invariants:
//! - Partial sync failure is surfaced as warning data on a success
//!   envelope, never as an error envelope.
//! - Store failures collapse to fixed caller-visible messages; the engine
//!   body, transport, and decoder detail is routed to the audit trail only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use policy_helm_core::StoreError;
use policy_helm_sync::SyncReport;
use serde::Serialize;

use crate::audit::AuditEvent;
use crate::audit::AuditLog;
use crate::coordinator::LifecycleError;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// The request a response envelope answers.
///
/// Echoed on every envelope so clients can correlate responses without
/// holding per-request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    /// HTTP method of the inbound request.
    pub method: String,
    /// Request path of the inbound request.
    pub path: String,
}

impl RequestInfo {
    /// Creates request context from a method and path.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

// ============================================================================
// SECTION: Error Classification
// ============================================================================

/// Maps a lifecycle error to the HTTP status a frontend should answer with.
///
/// Store transport and decode failures are the engine's fault, not the
/// caller's, so they classify as bad-gateway rather than server error.
#[must_use]
pub fn error_status(error: &LifecycleError) -> u16 {
    match error {
        LifecycleError::NotFound(_) | LifecycleError::NotFoundInExpectedState { .. } => 404,
        LifecycleError::InvalidContent | LifecycleError::InvalidRequest(_) => 400,
        LifecycleError::Store(store) => match store {
            StoreError::NotFound => 404,
            StoreError::Unreachable(_) | StoreError::Engine { .. } | StoreError::Decode(_) => 502,
        },
    }
}

/// Returns the fixed caller-visible message for a lifecycle error.
///
/// Lifecycle errors describe caller mistakes and are safe to echo. Store
/// errors carry engine bodies, transport errors, and decoder output, so
/// they collapse to fixed messages; the full detail belongs in the audit
/// trail.
fn caller_message(error: &LifecycleError) -> String {
    match error {
        LifecycleError::Store(store) => match store {
            StoreError::NotFound => "policy not found".to_string(),
            StoreError::Unreachable(_) => "engine unreachable".to_string(),
            StoreError::Engine { status, .. } => format!("engine error (status {status})"),
            StoreError::Decode(_) => "engine response invalid".to_string(),
        },
        other => other.to_string(),
    }
}

/// Error body of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Mapped HTTP-style status code.
    pub code: u16,
    /// Display message; internal detail is withheld.
    pub message: String,
}

// ============================================================================
// SECTION: Sync Warning
// ============================================================================

/// Warning data attached when a fan-out partially failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncWarning {
    /// Number of targets notified successfully.
    pub success_count: usize,
    /// Number of targets whose notification failed.
    pub failed_count: usize,
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Envelope status discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    /// The operation completed.
    Success,
    /// The operation failed.
    Error,
}

/// Uniform response envelope for lifecycle operations.
///
/// # Invariants
/// - `data` is present only on success; `error` only on failure.
/// - `warning` appears only on success envelopes with a degraded fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiEnvelope<T> {
    /// Success or error discriminant.
    pub status: EnvelopeStatus,
    /// Optional display message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error body on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    /// Echo of the answered request.
    pub request: RequestInfo,
    /// Operation payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Degraded-sync warning data on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<SyncWarning>,
}

impl<T> ApiEnvelope<T> {
    /// Builds a success envelope carrying a payload.
    #[must_use]
    pub fn success(request: RequestInfo, data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            message: None,
            error: None,
            request,
            data: Some(data),
            warning: None,
        }
    }

    /// Builds a success envelope, attaching warning data when the fan-out
    /// reported partial failure.
    #[must_use]
    pub fn success_with_sync(request: RequestInfo, data: T, report: &SyncReport) -> Self {
        let warning = report.has_failures().then(|| SyncWarning {
            success_count: report.success_count,
            failed_count: report.failed_count,
        });
        Self {
            status: EnvelopeStatus::Success,
            message: None,
            error: None,
            request,
            data: Some(data),
            warning,
        }
    }

    /// Builds an error envelope classified from a lifecycle error.
    ///
    /// Store failures are reduced to their fixed caller-visible messages;
    /// use [`ApiEnvelope::failure_audited`] to also capture the withheld
    /// detail.
    #[must_use]
    pub fn failure(request: RequestInfo, error: &LifecycleError) -> Self {
        let message = caller_message(error);
        Self {
            status: EnvelopeStatus::Error,
            message: Some(message.clone()),
            error: Some(ErrorBody {
                code: error_status(error),
                message,
            }),
            request,
            data: None,
            warning: None,
        }
    }

    /// Builds an error envelope and routes the withheld detail to the
    /// audit trail.
    ///
    /// Store errors record an [`AuditEvent::InternalError`] carrying the
    /// full display string (engine body included) keyed by the request.
    #[must_use]
    pub fn failure_audited(
        request: RequestInfo,
        error: &LifecycleError,
        audit: &dyn AuditLog,
    ) -> Self {
        if matches!(error, LifecycleError::Store(_)) {
            audit.record(AuditEvent::InternalError {
                context: format!("{} {}", request.method, request.path),
                detail: error.to_string(),
            });
        }
        Self::failure(request, error)
    }
}
