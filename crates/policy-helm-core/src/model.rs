// crates/policy-helm-core/src/model.rs
// ============================================================================
// Module: Policy Helm Data Model
// Description: Policy records, lifecycle status, and storage path rules.
// Purpose: Provide strongly typed, serializable policy state with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the unit of governance (the [`Policy`] record), its
//! lifecycle status, and the deterministic storage path under which the rule
//! engine holds the raw document. The engine itself has no lifecycle concept;
//! status is encoded entirely in the storage folder and mirrored in the
//! document's namespace header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Root folder for all policy documents on the engine.
pub const STORAGE_ROOT: &str = "policies";

/// File extension for rule documents.
pub const RULE_EXTENSION: &str = "rego";

/// Synthesized version when the engine tracks none.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Synthesized author when the engine tracks none.
pub const DEFAULT_CREATED_BY: &str = "system";

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Policy identifier, unique within one engine instance.
///
/// # Invariants
/// - Derived from the trailing path segment minus its file extension.
/// - Opaque UTF-8 string; no normalization is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Creates a new policy identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Lifecycle Status
// ============================================================================

/// Engine-visible lifecycle status of a policy.
///
/// # Invariants
/// - Variants are stable for serialization and folder naming.
/// - Draft/archived are higher-level states layered on by callers and are
///   never represented on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    /// Policy is active and evaluated by the engine.
    Enabled,
    /// Policy is parked under the disabled folder and not evaluated.
    Disabled,
}

impl PolicyStatus {
    /// Returns the storage folder name for this status.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }

    /// Derives the status from a storage path.
    ///
    /// A path containing a `disabled` segment is [`PolicyStatus::Disabled`];
    /// anything else is [`PolicyStatus::Enabled`]. Pure function of the path.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        if path.split('/').any(|segment| segment == Self::Disabled.folder()) {
            Self::Disabled
        } else {
            Self::Enabled
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

// ============================================================================
// SECTION: Storage Path
// ============================================================================

/// Deterministic engine-side location of a policy document.
///
/// # Invariants
/// - Renders as `policies/<status-folder>/<id>.rego`.
/// - At most one storage path should exist for a given id at any time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath {
    /// Policy identifier embedded in the trailing segment.
    id: PolicyId,
    /// Status encoded by the folder segment.
    status: PolicyStatus,
}

impl StoragePath {
    /// Creates the storage path for an id at a status.
    #[must_use]
    pub const fn new(id: PolicyId, status: PolicyStatus) -> Self {
        Self {
            id,
            status,
        }
    }

    /// Returns the policy identifier.
    #[must_use]
    pub const fn id(&self) -> &PolicyId {
        &self.id
    }

    /// Returns the encoded status.
    #[must_use]
    pub const fn status(&self) -> PolicyStatus {
        self.status
    }

    /// Renders the engine-side path string.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{STORAGE_ROOT}/{}/{}.{RULE_EXTENSION}", self.status.folder(), self.id)
    }

    /// Extracts the policy id from a storage path string.
    ///
    /// The id is the trailing path segment minus its file extension. An empty
    /// path yields an empty id; this never fails.
    #[must_use]
    pub fn derive_id(path: &str) -> PolicyId {
        let tail = path.rsplit('/').next().unwrap_or(path);
        let stem = tail.rsplit_once('.').map_or(tail, |(stem, _ext)| stem);
        PolicyId::new(stem)
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ============================================================================
// SECTION: Documents and Records
// ============================================================================

/// Raw rule document as stored by the engine.
///
/// # Invariants
/// - `id` is the engine's path-style identifier for the document.
/// - `raw` is opaque beyond its namespace header and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Engine-side document identifier (path form).
    pub id: String,
    /// Complete rule document source text.
    pub raw: String,
}

/// Display-ready policy record.
///
/// # Invariants
/// - `name`, `description`, and `scope_tags` are inferred, not authoritative,
///   and regenerable at any time from `raw_source` and `id`.
/// - `version`, `created_at`, and `created_by` are synthesized bookkeeping;
///   the engine does not track them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Complete rule document source text.
    pub raw_source: String,
    /// Lifecycle status derived from the storage path.
    pub status: PolicyStatus,
    /// Inferred display name.
    pub name: String,
    /// Inferred display description.
    pub description: String,
    /// Inferred scope tags in deterministic order.
    pub scope_tags: Vec<String>,
    /// Best-effort version string.
    pub version: String,
    /// Best-effort creation timestamp (RFC 3339 or empty).
    pub created_at: String,
    /// Best-effort author.
    pub created_by: String,
}
