// crates/policy-helm-sync/tests/fan_out.rs
// ============================================================================
// Module: Sync Fan-Out Tests
// Description: Tests for scatter/gather aggregation and notifier behavior.
// Purpose: Exercise partial failure isolation and the agent push API mapping.
// Dependencies: policy-helm-sync, serde_json, tiny_http
// ============================================================================
//! ## Overview
//! Validates fan-out aggregation, failure isolation, and HTTP push delivery.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::mpsc;

use policy_helm_sync::CallbackNotifier;
use policy_helm_sync::ChannelNotifier;
use policy_helm_sync::HttpNotifier;
use policy_helm_sync::Notifier;
use policy_helm_sync::NotifyError;
use policy_helm_sync::SyncTarget;
use policy_helm_sync::SyncTrigger;
use serde_json::json;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn targets(names: &[&str]) -> Vec<SyncTarget> {
    names.iter().map(|name| SyncTarget::new(*name, format!("http://{name}.invalid"))).collect()
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

#[test]
fn fan_out_counts_partial_failure() {
    let notifier = CallbackNotifier::new(|target: &SyncTarget| {
        if target.name == "agent-b" {
            Err(NotifyError::Delivery("connection refused".to_string()))
        } else {
            Ok(())
        }
    });
    let trigger = SyncTrigger::new(Arc::new(notifier));
    let report = trigger.fan_out(&targets(&["agent-a", "agent-b", "agent-c"]));
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failed_count, 1);
    assert!(report.has_failures());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].target, "agent-b");
    assert!(report.failures[0].detail.contains("connection refused"));
}

#[test]
fn fan_out_reports_failures_in_target_order() {
    let notifier = CallbackNotifier::new(|target: &SyncTarget| {
        if target.name.ends_with("odd") {
            Err(NotifyError::Delivery("down".to_string()))
        } else {
            Ok(())
        }
    });
    let trigger = SyncTrigger::with_concurrency(Arc::new(notifier), 2);
    let report = trigger.fan_out(&targets(&["1-odd", "2-even", "3-odd", "4-even", "5-odd"]));
    assert_eq!(report.success_count, 2);
    assert_eq!(report.failed_count, 3);
    let order: Vec<&str> = report.failures.iter().map(|f| f.target.as_str()).collect();
    assert_eq!(order, vec!["1-odd", "3-odd", "5-odd"]);
}

#[test]
fn fan_out_with_no_targets_is_empty() {
    let notifier = CallbackNotifier::new(|_target: &SyncTarget| Ok(()));
    let trigger = SyncTrigger::new(Arc::new(notifier));
    let report = trigger.fan_out(&[]);
    assert_eq!(report.success_count, 0);
    assert_eq!(report.failed_count, 0);
    assert!(!report.has_failures());
}

#[test]
fn channel_notifier_observes_every_target() {
    let (tx, rx) = mpsc::channel();
    let trigger = SyncTrigger::with_concurrency(Arc::new(ChannelNotifier::from_sender(tx)), 1);
    let report = trigger.fan_out(&targets(&["agent-a", "agent-b"]));
    assert_eq!(report.success_count, 2);
    let mut seen: Vec<String> = rx.try_iter().map(|target| target.name).collect();
    seen.sort();
    assert_eq!(seen, vec!["agent-a".to_string(), "agent-b".to_string()]);
}

#[test]
fn zero_concurrency_is_clamped() {
    let notifier = CallbackNotifier::new(|_target: &SyncTarget| Ok(()));
    let trigger = SyncTrigger::with_concurrency(Arc::new(notifier), 0);
    let report = trigger.fan_out(&targets(&["agent-a"]));
    assert_eq!(report.success_count, 1);
}

// ============================================================================
// SECTION: HTTP Delivery
// ============================================================================

#[test]
fn http_notifier_posts_repull_config() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = std::thread::spawn(move || {
        let mut request = server.recv().expect("request");
        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).expect("request body");
        let url = request.url().to_string();
        let method = request.method().to_string();
        request.respond(Response::from_string("{}").with_status_code(200)).expect("respond");
        (method, url, body)
    });

    let mut target = SyncTarget::new("agent-a", format!("http://{addr}"));
    target.topic = Some("policy_data".to_string());
    target.dst_path = Some("/acl".to_string());
    target.config = Some(json!({"poll_seconds": 30}));
    let notifier = HttpNotifier::new().expect("http notifier");
    notifier.notify(&target).expect("notify");

    let (method, url, body) = handle.join().expect("server thread");
    assert_eq!(method, "POST");
    assert_eq!(url, "/data/config");
    assert!(body.contains(r#""topic":"policy_data""#));
    assert!(body.contains(r#""dst_path":"/acl""#));
    assert!(body.contains(r#""config":{"poll_seconds":30}"#));
    assert!(!body.contains(r#""url""#));
    assert!(!body.contains(r#""data""#));
}

#[test]
fn http_notifier_fails_closed_on_error_status() {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr();
    let handle = std::thread::spawn(move || {
        let request = server.recv().expect("request");
        request.respond(Response::from_string("busy").with_status_code(503)).expect("respond");
    });
    let notifier = HttpNotifier::new().expect("http notifier");
    let error = notifier.notify(&SyncTarget::new("agent-a", format!("http://{addr}")));
    handle.join().expect("server thread");
    assert!(matches!(error, Err(NotifyError::Delivery(detail)) if detail.contains("503")));
}

#[test]
fn http_notifier_rejects_bad_endpoints() {
    let notifier = HttpNotifier::new().expect("http notifier");
    let error = notifier.notify(&SyncTarget::new("agent-a", "ftp://example.invalid"));
    assert!(matches!(error, Err(NotifyError::InvalidEndpoint(_))));
}
