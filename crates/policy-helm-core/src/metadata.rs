// crates/policy-helm-core/src/metadata.rs
// ============================================================================
// Module: Display Metadata Inference
// Description: Heuristic derivation of name, description, and scope tags.
// Purpose: Produce regenerable display metadata from a document and its id.
// Dependencies: crate::model, crate::namespace
// ============================================================================

//! ## Overview
//! Pure, deterministic inference of human-facing display metadata from a
//! policy id and its raw source. Inference is explicitly heuristic and
//! best-effort: it never fails, and on any unexpected input it falls back to
//! generic templated values. It affects cosmetic display only, never policy
//! semantics. Rules are ordered tables evaluated in a fixed order so
//! identical input always yields identical output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::PolicyId;
use crate::namespace::package_value;

// ============================================================================
// SECTION: Rule Tables
// ============================================================================

/// Ordered id-substring rules for name and description inference.
///
/// Evaluated top to bottom; the first matching rule wins.
const NAME_RULES: &[(&str, &str, &str)] = &[
    ("admin", "Admin Access Policy", "Controls administrative access to the system"),
    ("role", "Role Based Access Policy", "Governs access based on assigned roles"),
    ("rbac", "Role Based Access Policy", "Governs access based on assigned roles"),
    ("api", "API Access Policy", "Restricts access to API endpoints"),
    ("mask", "Data Masking Policy", "Masks sensitive fields in returned data"),
    ("privacy", "Data Privacy Policy", "Protects personally identifiable information"),
    ("user", "User Access Policy", "Governs access for individual users"),
];

/// Ordered keyword rules for scope tag inference.
///
/// Evaluated top to bottom; every matching rule contributes its tag once.
const SCOPE_RULES: &[(&[&str], &str)] = &[
    (&["role", "admin"], "Role Management"),
    (&["api", "endpoint"], "API Access"),
    (&["data", "database"], "Data Access"),
    (&["mask", "privacy"], "Data Privacy"),
    (&["user", "subject"], "User Management"),
];

/// Fallback scope tag when no keyword rule matches.
const GENERIC_SCOPE_TAG: &str = "Application";

/// Comment marker scanned for inline descriptions.
const COMMENT_MARKER: char = '#';

// ============================================================================
// SECTION: Name and Description
// ============================================================================

/// Derives a display name and description for a policy.
///
/// Precedence: a leading comment line mentioning "description" supplies the
/// description; the ordered id-substring table supplies the name (and the
/// description when no comment provided one); the final fallback is a
/// templated pair built from the id. Never fails.
#[must_use]
pub fn derive_name_and_description(id: &PolicyId, raw: &str) -> (String, String) {
    let comment_description = scan_description_comment(raw);
    let lowered = id.as_str().to_lowercase();
    for (needle, name, description) in NAME_RULES {
        if lowered.contains(needle) {
            let description =
                comment_description.unwrap_or_else(|| (*description).to_string());
            return ((*name).to_string(), description);
        }
    }
    let name = format!("{} Access Policy", title_case(id.as_str()));
    let description = comment_description
        .unwrap_or_else(|| format!("Access control policy for {}", id.as_str()));
    (name, description)
}

/// Scans leading comment lines for a description mention.
///
/// Scanning stops at the namespace header; a comment containing
/// "description" contributes the text after its first colon, or the whole
/// comment body when no colon is present.
fn scan_description_comment(raw: &str) -> Option<String> {
    for line in raw.lines() {
        let trimmed = line.trim();
        if package_value(trimmed).is_some() {
            break;
        }
        let Some(body) = trimmed.strip_prefix(COMMENT_MARKER) else {
            continue;
        };
        if !body.to_lowercase().contains("description") {
            continue;
        }
        let text = body.split_once(':').map_or(body, |(_, rest)| rest).trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }
    None
}

/// Title-cases an identifier, treating `-` and `_` as word separators.
fn title_case(id: &str) -> String {
    let words: Vec<String> = id
        .split(['-', '_', '.'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect();
    if words.is_empty() {
        "Policy".to_string()
    } else {
        words.join(" ")
    }
}

// ============================================================================
// SECTION: Scope Tags
// ============================================================================

/// Derives scope tags for a policy.
///
/// The ordered keyword table is evaluated against the lowercased source
/// first; when no rule matches, the same table is evaluated against the id;
/// when still empty, the generic tag applies. Repeated calls on identical
/// input produce the identical tag vector. Never fails.
#[must_use]
pub fn derive_scope_tags(id: &PolicyId, raw: &str) -> Vec<String> {
    let source = raw.to_lowercase();
    let mut tags = match_scope_rules(&source);
    if tags.is_empty() {
        let lowered_id = id.as_str().to_lowercase();
        tags = match_scope_rules(&lowered_id);
    }
    if tags.is_empty() {
        tags.push(GENERIC_SCOPE_TAG.to_string());
    }
    tags
}

/// Evaluates the scope rule table against a lowercased haystack.
fn match_scope_rules(haystack: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for (needles, tag) in SCOPE_RULES {
        if needles.iter().any(|needle| haystack.contains(needle)) {
            tags.push((*tag).to_string());
        }
    }
    tags
}
