// crates/policy-helm-core/src/interfaces.rs
// ============================================================================
// Module: Store Interfaces
// Description: The policy store seam, its error taxonomy, and evaluation types.
// Purpose: Let the lifecycle layer compose any store implementation.
// Dependencies: serde, thiserror, crate::model
// ============================================================================

//! ## Overview
//! [`PolicyStore`] is the seam between the lifecycle coordinator and the
//! rule engine. The HTTP store crate implements it against the engine's REST
//! surface; tests implement it in memory. Store implementations report
//! precisely and never retry or recover; retry policy belongs to callers.
//! Invariants:
//! - Decode failures are distinct from business errors.
//! - `evaluate` never propagates failure; it returns the safe deny default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::RawDocument;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Errors reported by policy store implementations.
///
/// # Invariants
/// - Variants are stable for programmatic handling and code mapping.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document or path absent on the engine.
    #[error("policy not found")]
    NotFound,
    /// Network-level failure reaching the engine.
    #[error("engine unreachable: {0}")]
    Unreachable(String),
    /// Non-2xx engine response with attached detail.
    #[error("engine error (status {status}): {detail}")]
    Engine {
        /// HTTP status returned by the engine.
        status: u16,
        /// Engine-provided detail string.
        detail: String,
    },
    /// Well-formed transport, malformed response body.
    #[error("engine response decode failure: {0}")]
    Decode(String),
}

/// Outcome of a delete request against the engine.
///
/// # Invariants
/// - A 404 on delete means the target was already absent and is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document existed and was removed.
    Deleted,
    /// The document was already absent.
    AlreadyAbsent,
}

// ============================================================================
// SECTION: Evaluation Types
// ============================================================================

/// Subject of an evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalUser {
    /// Subject identifier.
    pub id: String,
}

/// Resource of an evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResource {
    /// Resource type label.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource identifier.
    pub id: String,
}

/// Input document posted to the engine's data API.
///
/// # Invariants
/// - Serializes bit-exact as `{user: {id}, resource: {type, id}, action}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalInput {
    /// Requesting subject.
    pub user: EvalUser,
    /// Target resource.
    pub resource: EvalResource,
    /// Requested action.
    pub action: String,
}

/// Allow/deny outcome of an evaluation request.
///
/// # Invariants
/// - A failed or unanswered evaluation is always `allow = false` with the
///   safe default reason; callers must never silently fail open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the request is allowed.
    pub allow: bool,
    /// Human-readable reason for the outcome.
    pub reason: String,
}

impl Decision {
    /// Reason attached to successful evaluations.
    pub const REASON_EVALUATED: &'static str = "Policy evaluation successful";

    /// Reason attached to the safe deny default.
    pub const REASON_NO_MATCH: &'static str = "No matching policy";

    /// Returns the safe deny default used when evaluation cannot complete.
    #[must_use]
    pub fn deny_default() -> Self {
        Self {
            allow: false,
            reason: Self::REASON_NO_MATCH.to_string(),
        }
    }

    /// Returns an evaluated decision carrying the engine's verdict.
    #[must_use]
    pub fn evaluated(allow: bool) -> Self {
        Self {
            allow,
            reason: Self::REASON_EVALUATED.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Store Trait
// ============================================================================

/// Typed access to the engine's rule-document API.
///
/// Implementations perform no retries and keep no state beyond their
/// transport handle; every method maps one engine request.
pub trait PolicyStore: Send + Sync {
    /// Fetches every stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unreachable`] on network failure and
    /// [`StoreError::Engine`] on a non-2xx engine response.
    fn list(&self) -> Result<Vec<RawDocument>, StoreError>;

    /// Fetches one document by storage path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] on a 404 and [`StoreError::Engine`]
    /// on any other non-2xx response.
    fn get(&self, path: &str) -> Result<RawDocument, StoreError>;

    /// Creates or replaces a document at a storage path. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on a non-2xx engine response.
    fn put(&self, path: &str, content: &str) -> Result<(), StoreError>;

    /// Deletes a document at a storage path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Engine`] on a non-2xx response other than 404,
    /// which reports [`DeleteOutcome::AlreadyAbsent`] instead.
    fn delete(&self, path: &str) -> Result<DeleteOutcome, StoreError>;

    /// Posts an evaluation request.
    ///
    /// Never propagates failure: any transport, engine, or decode problem
    /// yields the safe deny default instead.
    fn evaluate(&self, input: &EvalInput) -> Decision;
}
