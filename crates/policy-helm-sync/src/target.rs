// crates/policy-helm-sync/src/target.rs
// ============================================================================
// Module: Sync Targets
// Description: Addresses of remote enforcement agents.
// Purpose: Describe where re-pull notifications are delivered.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`SyncTarget`] is the ephemeral address of one enforcement agent,
//! supplied by configuration or an external registry and consumed only by
//! the sync trigger. The optional fields populate the agent push API body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Sync Target
// ============================================================================

/// Address of one enforcement agent.
///
/// # Invariants
/// - `endpoint` is the agent base URL; the notifier appends its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    /// Stable label used in reports and logs.
    pub name: String,
    /// Agent base URL.
    pub endpoint: String,
    /// Optional source URL the agent should re-pull from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional topic routing hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Optional destination path inside the agent's data tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_path: Option<String>,
    /// Optional configuration blob forwarded verbatim to the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    /// Optional data blob forwarded verbatim to the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SyncTarget {
    /// Creates a target with only a name and endpoint.
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            url: None,
            topic: None,
            dst_path: None,
            config: None,
            data: None,
        }
    }
}
