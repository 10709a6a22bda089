// crates/policy-helm-core/src/lib.rs
// ============================================================================
// Module: Policy Helm Core
// Description: Data model, path and namespace rules, and store interfaces.
// Purpose: Define the shared vocabulary for the policy lifecycle layer.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types for the policy lifecycle and synchronization layer. The rule
//! engine stores raw rule documents under status-scoped paths; this crate
//! defines the path rules, the namespace-header rewrite rules, the metadata
//! inference heuristics, and the [`PolicyStore`] seam implemented by the
//! HTTP store client and by in-memory test stores.
//! Invariants:
//! - At most one storage path exists per policy id; transient duplicates are
//!   a known consistency hazard detected at list time, never repaired here.
//! - The namespace header's leading segment mirrors the storage folder.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod interfaces;
pub mod metadata;
pub mod model;
pub mod namespace;

pub use interfaces::Decision;
pub use interfaces::DeleteOutcome;
pub use interfaces::EvalInput;
pub use interfaces::EvalResource;
pub use interfaces::EvalUser;
pub use interfaces::PolicyStore;
pub use interfaces::StoreError;
pub use model::Policy;
pub use model::PolicyId;
pub use model::PolicyStatus;
pub use model::RawDocument;
pub use model::StoragePath;
