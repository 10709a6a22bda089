// crates/policy-helm-sync/src/notifier/http.rs
// ============================================================================
// Module: HTTP Notifier
// Description: Agent push API delivery over HTTP POST.
// Purpose: Post a re-pull configuration to an agent's data config route.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! [`HttpNotifier`] posts `POST {endpoint}/data/config` with the target's
//! optional url/topic/dst_path fields as the body. Status 200 and 201 are
//! success; anything else fails closed. The notifier owns a bounded timeout
//! so one slow agent cannot stall the fan-out indefinitely.
//! Invariants:
//! - Redirects are not followed.
//! - One client instance per notifier; no per-call client creation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::notifier::Notifier;
use crate::notifier::NotifyError;
use crate::target::SyncTarget;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Agent push API route appended to the target endpoint.
const CONFIG_ROUTE: &str = "data/config";

/// Default per-call timeout in milliseconds.
pub const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 3_000;

// ============================================================================
// SECTION: Push Body
// ============================================================================

/// Body of the agent push request.
///
/// # Invariants
/// - Absent optional fields are omitted from the wire form.
#[derive(Debug, Serialize)]
struct RepullRequest<'a> {
    /// Source URL the agent should re-pull from.
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    /// Topic routing hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    /// Destination path inside the agent's data tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    dst_path: Option<&'a str>,
    /// Opaque configuration blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a Value>,
    /// Opaque data blob.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

// ============================================================================
// SECTION: HTTP Notifier
// ============================================================================

/// Production notifier speaking the agent push API.
pub struct HttpNotifier {
    /// HTTP client used for all pushes.
    client: Client,
}

impl HttpNotifier {
    /// Creates a notifier with the default bounded timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, NotifyError> {
        Self::with_timeout(Duration::from_millis(DEFAULT_NOTIFY_TIMEOUT_MS))
    }

    /// Creates a notifier with a specific per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the HTTP client cannot be constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        Ok(Self {
            client,
        })
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, target: &SyncTarget) -> Result<(), NotifyError> {
        let base = Url::parse(&target.endpoint)
            .map_err(|err| NotifyError::InvalidEndpoint(err.to_string()))?;
        match base.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(NotifyError::InvalidEndpoint(format!("unsupported scheme: {scheme}")));
            }
        }
        let url = format!("{}/{CONFIG_ROUTE}", target.endpoint.trim_end_matches('/'));
        let body = RepullRequest {
            url: target.url.as_deref(),
            topic: target.topic.as_deref(),
            dst_path: target.dst_path.as_deref(),
            config: target.config.as_ref(),
            data: target.data.as_ref(),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        match response.status().as_u16() {
            200 | 201 => Ok(()),
            status => Err(NotifyError::Delivery(format!("agent returned status {status}"))),
        }
    }
}
