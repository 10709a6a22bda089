// crates/policy-helm-store/src/lib.rs
// ============================================================================
// Module: Policy Helm Store
// Description: HTTP client for the rule engine's document and data APIs.
// Purpose: Implement the PolicyStore seam over the engine's REST surface.
// Dependencies: policy-helm-core, reqwest, serde, thiserror, url
// ============================================================================

//! ## Overview
//! This crate is the only component that talks to the external rule engine.
//! [`EngineClient`] wraps a single injected `reqwest` blocking client with
//! configured timeouts and decodes every engine response into typed schemas
//! at the boundary. It is pure request/response: no state, no retries, no
//! recovery.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

pub use client::ClientError;
pub use client::EngineClient;
pub use client::EngineConfig;
