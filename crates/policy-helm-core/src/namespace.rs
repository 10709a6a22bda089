// crates/policy-helm-core/src/namespace.rs
// ============================================================================
// Module: Namespace Header Rules
// Description: Locate and rewrite the package declaration of a rule document.
// Purpose: Keep the namespace header's leading segment mirroring the storage folder.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! The engine partitions rule sets by namespace, not by path, so the first
//! `package` declaration inside a document must mirror the status folder the
//! document is stored under. This module implements the rewrite rules used
//! on create (force the prefix) and on enable/disable moves (replace, insert,
//! or leave the prefix).
//! Invariants:
//! - Only the first package line is ever touched; the rest of the document is
//!   opaque and passes through byte for byte.
//! - A move rewrite is a no-op when the header is already correctly prefixed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::PolicyId;
use crate::model::PolicyStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Keyword introducing the namespace header line.
const PACKAGE_KEYWORD: &str = "package";

// ============================================================================
// SECTION: Header Lookup
// ============================================================================

/// Returns the namespace value of the first package line, when present.
///
/// The value is the text after the `package` keyword, trimmed. Lines that
/// merely start with the keyword as a prefix of a longer word do not match.
#[must_use]
pub fn package_value(raw: &str) -> Option<&str> {
    raw.lines().find_map(|line| {
        let trimmed = line.trim_start();
        let rest = trimmed.strip_prefix(PACKAGE_KEYWORD)?;
        if rest.is_empty() {
            return Some("");
        }
        rest.starts_with(char::is_whitespace).then(|| rest.trim())
    })
}

/// Returns true when the namespace value carries the folder as its leading segment.
#[must_use]
pub fn has_status_prefix(value: &str, status: PolicyStatus) -> bool {
    let folder = status.folder();
    value == folder || value.starts_with(folder) && value[folder.len()..].starts_with('.')
}

// ============================================================================
// SECTION: Rewrites
// ============================================================================

/// Forces the namespace header to carry the status folder as its leading segment.
///
/// Used on create/update. When the document has no package line at all, one
/// is synthesized as `package <folder>.<id>` and prepended.
#[must_use]
pub fn force_status_prefix(raw: &str, id: &PolicyId, status: PolicyStatus) -> String {
    if package_value(raw).is_none() {
        let header = format!("{PACKAGE_KEYWORD} {}.{id}", status.folder());
        if raw.is_empty() {
            return header;
        }
        return format!("{header}\n{raw}");
    }
    rewrite_first_package(raw, |value| prefix_value(value, status))
}

/// Rewrites the header prefix for a status move from `old` to `new`.
///
/// Replace-prefix when the value starts with the old folder; no-op when it
/// already starts with the new folder; prefix-insert otherwise. Documents
/// without any package line pass through unchanged.
#[must_use]
pub fn rewrite_status_prefix(raw: &str, old: PolicyStatus, new: PolicyStatus) -> String {
    if package_value(raw).is_none() {
        return raw.to_string();
    }
    rewrite_first_package(raw, |value| {
        if has_status_prefix(value, new) {
            value.to_string()
        } else if has_status_prefix(value, old) {
            let remainder = value.strip_prefix(old.folder()).unwrap_or(value);
            format!("{}{remainder}", new.folder())
        } else {
            prefix_value(value, new)
        }
    })
}

/// Prepends the status folder to a namespace value unless already present.
fn prefix_value(value: &str, status: PolicyStatus) -> String {
    if has_status_prefix(value, status) {
        return value.to_string();
    }
    let stripped = strip_known_prefix(value);
    if stripped.is_empty() {
        status.folder().to_string()
    } else {
        format!("{}.{stripped}", status.folder())
    }
}

/// Drops a recognizable status prefix from a namespace value.
fn strip_known_prefix(value: &str) -> &str {
    for status in [PolicyStatus::Enabled, PolicyStatus::Disabled] {
        if has_status_prefix(value, status) {
            let rest = &value[status.folder().len()..];
            return rest.strip_prefix('.').unwrap_or(rest);
        }
    }
    value
}

/// Applies a rewrite to the first package line, leaving everything else intact.
fn rewrite_first_package(raw: &str, rewrite: impl Fn(&str) -> String) -> String {
    let mut rewritten = false;
    let mut lines = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim_start();
        let is_header = !rewritten
            && trimmed
                .strip_prefix(PACKAGE_KEYWORD)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));
        if is_header {
            rewritten = true;
            let indent = &line[..line.len() - trimmed.len()];
            let value = trimmed[PACKAGE_KEYWORD.len()..].trim();
            lines.push(format!("{indent}{PACKAGE_KEYWORD} {}", rewrite(value)));
        } else {
            lines.push(line.to_string());
        }
    }
    let mut out = lines.join("\n");
    if raw.ends_with('\n') {
        out.push('\n');
    }
    out
}
