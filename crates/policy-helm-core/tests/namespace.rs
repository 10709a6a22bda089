// crates/policy-helm-core/tests/namespace.rs
// ============================================================================
// Module: Namespace and Path Rule Tests
// Description: Tests for storage paths, status derivation, and header rewrites.
// Purpose: Pin the path/namespace mirroring invariant and move rewrite rules.
// Dependencies: policy-helm-core
// ============================================================================
//! ## Overview
//! Validates storage path rendering, status derivation from paths, and the
//! replace/insert/no-op rewrite rules for the namespace header.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use policy_helm_core::PolicyId;
use policy_helm_core::PolicyStatus;
use policy_helm_core::StoragePath;
use policy_helm_core::namespace::force_status_prefix;
use policy_helm_core::namespace::package_value;
use policy_helm_core::namespace::rewrite_status_prefix;

#[test]
fn storage_path_renders_status_folder() {
    let enabled = StoragePath::new(PolicyId::new("main"), PolicyStatus::Enabled);
    let disabled = StoragePath::new(PolicyId::new("main"), PolicyStatus::Disabled);
    assert_eq!(enabled.render(), "policies/enabled/main.rego");
    assert_eq!(disabled.render(), "policies/disabled/main.rego");
}

#[test]
fn derive_id_strips_folders_and_extension() {
    assert_eq!(StoragePath::derive_id("policies/enabled/main.rego").as_str(), "main");
    assert_eq!(StoragePath::derive_id("main.rego").as_str(), "main");
    assert_eq!(StoragePath::derive_id("main").as_str(), "main");
    assert_eq!(StoragePath::derive_id("").as_str(), "");
}

#[test]
fn status_derivation_depends_only_on_path_segments() {
    assert_eq!(PolicyStatus::from_path("policies/enabled/main.rego"), PolicyStatus::Enabled);
    assert_eq!(PolicyStatus::from_path("policies/disabled/main.rego"), PolicyStatus::Disabled);
    // A file merely named like the folder is not a disabled segment.
    assert_eq!(PolicyStatus::from_path("policies/enabled/disabled_x.rego"), PolicyStatus::Enabled);
    assert_eq!(PolicyStatus::from_path(""), PolicyStatus::Enabled);
}

#[test]
fn package_value_finds_first_header() {
    let raw = "# comment\npackage enabled.main\npackage shadowed\n";
    assert_eq!(package_value(raw), Some("enabled.main"));
    assert_eq!(package_value("packages.not_a_header\n"), None);
    assert_eq!(package_value("allow := true\n"), None);
}

#[test]
fn move_rewrite_replaces_old_prefix() {
    let raw = "package enabled.main\nallow := true\n";
    let moved = rewrite_status_prefix(raw, PolicyStatus::Enabled, PolicyStatus::Disabled);
    assert_eq!(moved, "package disabled.main\nallow := true\n");
}

#[test]
fn move_rewrite_is_noop_when_already_prefixed() {
    let raw = "package disabled.main\nallow := true\n";
    let moved = rewrite_status_prefix(raw, PolicyStatus::Enabled, PolicyStatus::Disabled);
    assert_eq!(moved, raw);
}

#[test]
fn move_rewrite_inserts_prefix_when_unrecognized() {
    let raw = "package billing.main\n";
    let moved = rewrite_status_prefix(raw, PolicyStatus::Enabled, PolicyStatus::Disabled);
    assert_eq!(moved, "package disabled.billing.main\n");
}

#[test]
fn move_rewrite_round_trips_header() {
    let raw = "package enabled.main\nallow := true\n";
    let disabled = rewrite_status_prefix(raw, PolicyStatus::Enabled, PolicyStatus::Disabled);
    let restored = rewrite_status_prefix(&disabled, PolicyStatus::Disabled, PolicyStatus::Enabled);
    assert_eq!(restored, raw);
}

#[test]
fn move_rewrite_ignores_documents_without_header() {
    let raw = "allow := true\n";
    let moved = rewrite_status_prefix(raw, PolicyStatus::Enabled, PolicyStatus::Disabled);
    assert_eq!(moved, raw);
}

#[test]
fn force_prefix_rewrites_existing_header() {
    let id = PolicyId::new("main");
    let forced = force_status_prefix("package disabled.main\n", &id, PolicyStatus::Enabled);
    assert_eq!(forced, "package enabled.main\n");
}

#[test]
fn force_prefix_synthesizes_missing_header() {
    let id = PolicyId::new("main");
    let forced = force_status_prefix("allow := true\n", &id, PolicyStatus::Enabled);
    assert_eq!(forced, "package enabled.main\nallow := true\n");
    assert_eq!(force_status_prefix("", &id, PolicyStatus::Disabled), "package disabled.main");
}

#[test]
fn force_prefix_preserves_foreign_namespaces() {
    let id = PolicyId::new("main");
    let forced = force_status_prefix("package billing.main\n", &id, PolicyStatus::Enabled);
    assert_eq!(forced, "package enabled.billing.main\n");
}
