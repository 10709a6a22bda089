// crates/policy-helm-store/src/client.rs
// ============================================================================
// Module: Engine Client
// Description: Typed request/response access to the rule engine.
// Purpose: Map the engine's REST surface onto the PolicyStore seam.
// Dependencies: policy-helm-core, reqwest, serde, thiserror, url
// ============================================================================

//! ## Overview
//! [`EngineClient`] issues blocking HTTP requests against the engine's
//! document API (`/v1/policies`) and data API (`/v1/data`). Responses are
//! decoded into explicit schemas; a malformed 2xx body is a
//! [`StoreError::Decode`], distinct from business errors. Engine error
//! bodies are captured as detail strings, truncated to a fixed cap.
//! Invariants:
//! - One client instance per [`EngineClient`]; no per-call client creation.
//! - No retries and no recovery; callers decide retry policy.
//! - `evaluate` returns the safe deny default on any failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use policy_helm_core::Decision;
use policy_helm_core::DeleteOutcome;
use policy_helm_core::EvalInput;
use policy_helm_core::PolicyStore;
use policy_helm_core::RawDocument;
use policy_helm_core::StoreError;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum engine error detail captured per response.
const MAX_DETAIL_BYTES: usize = 2_048;

/// Document API route prefix.
const POLICIES_ROUTE: &str = "v1/policies";

/// Data API route.
const DATA_ROUTE: &str = "v1/data";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the engine client.
///
/// # Invariants
/// - `base_url` must be `http` or `https` without embedded credentials.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Engine base URL (for example `http://127.0.0.1:8181`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Optional bearer token attached to every request.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Default engine base URL.
fn default_base_url() -> String {
    "http://127.0.0.1:8181".to_string()
}

/// Default request timeout in milliseconds.
const fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            bearer_token: None,
        }
    }
}

// ============================================================================
// SECTION: Construction Errors
// ============================================================================

/// Errors raised while constructing an engine client.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL failed validation.
    #[error("invalid engine url: {0}")]
    InvalidEndpoint(String),
    /// Underlying HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Response Schemas
// ============================================================================

/// Envelope of `GET /v1/policies`.
#[derive(Debug, Deserialize)]
struct ListResponse {
    /// Stored documents.
    result: Vec<ListedDocument>,
}

/// One entry of the list response.
#[derive(Debug, Deserialize)]
struct ListedDocument {
    /// Engine-side document identifier (path form).
    id: String,
    /// Complete rule document source text.
    raw: String,
}

/// Envelope of `GET /v1/policies/{path}`.
#[derive(Debug, Deserialize)]
struct GetResponse {
    /// Stored document body.
    result: DocumentBody,
}

/// Body of a single-document response.
#[derive(Debug, Deserialize)]
struct DocumentBody {
    /// Complete rule document source text.
    raw: String,
}

/// Envelope of `POST /v1/data`.
#[derive(Debug, Deserialize)]
struct DataResponse {
    /// Evaluation verdict; absent when no rule set matched.
    result: Option<Verdict>,
}

/// Verdict body of a data response.
#[derive(Debug, Deserialize)]
struct Verdict {
    /// Whether the request is allowed.
    #[serde(default)]
    allow: bool,
}

/// Body of `POST /v1/data` requests.
#[derive(Debug, serde::Serialize)]
struct DataRequest<'a> {
    /// Evaluation input document.
    input: &'a EvalInput,
}

// ============================================================================
// SECTION: Engine Client
// ============================================================================

/// Blocking HTTP client for the rule engine.
///
/// # Invariants
/// - Redirects are not followed.
/// - The configured timeout bounds every request.
pub struct EngineClient {
    /// Validated engine base URL without trailing slash.
    base_url: String,
    /// Optional bearer token attached to every request.
    bearer_token: Option<String>,
    /// HTTP client used for all requests.
    client: Client,
}

impl EngineClient {
    /// Creates an engine client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: EngineConfig) -> Result<Self, ClientError> {
        let url = Url::parse(&config.base_url)
            .map_err(|err| ClientError::InvalidEndpoint(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ClientError::InvalidEndpoint(format!("unsupported scheme: {scheme}")));
            }
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ClientError::InvalidEndpoint("credentials are not allowed".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
            client,
        })
    }

    /// Returns the document API URL for a storage path.
    fn policy_url(&self, path: &str) -> String {
        format!("{}/{POLICIES_ROUTE}/{path}", self.base_url)
    }

    /// Attaches the optional bearer token to a request.
    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Reads a bounded error detail string from a non-2xx response.
    fn error_detail(response: Response) -> String {
        let text = response.text().unwrap_or_default();
        if text.len() <= MAX_DETAIL_BYTES {
            return text;
        }
        let mut end = MAX_DETAIL_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    }

    /// Maps a non-2xx response to an engine error with captured detail.
    fn engine_error(response: Response) -> StoreError {
        let status = response.status().as_u16();
        StoreError::Engine {
            status,
            detail: Self::error_detail(response),
        }
    }
}

impl PolicyStore for EngineClient {
    fn list(&self) -> Result<Vec<RawDocument>, StoreError> {
        let url = format!("{}/{POLICIES_ROUTE}", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::engine_error(response));
        }
        let decoded: ListResponse =
            response.json().map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(decoded
            .result
            .into_iter()
            .map(|entry| RawDocument {
                id: entry.id,
                raw: entry.raw,
            })
            .collect())
    }

    fn get(&self, path: &str) -> Result<RawDocument, StoreError> {
        let response = self
            .authorize(self.client.get(self.policy_url(path)))
            .send()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::engine_error(response));
        }
        let decoded: GetResponse =
            response.json().map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(RawDocument {
            id: path.to_string(),
            raw: decoded.result.raw,
        })
    }

    fn put(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.put(self.policy_url(path)))
            .header(CONTENT_TYPE, "text/plain")
            .body(content.to_string())
            .send()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::engine_error(response));
        }
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<DeleteOutcome, StoreError> {
        let response = self
            .authorize(self.client.delete(self.policy_url(path)))
            .send()
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::AlreadyAbsent);
        }
        if !response.status().is_success() {
            return Err(Self::engine_error(response));
        }
        Ok(DeleteOutcome::Deleted)
    }

    fn evaluate(&self, input: &EvalInput) -> Decision {
        let url = format!("{}/{DATA_ROUTE}", self.base_url);
        let request = DataRequest {
            input,
        };
        let Ok(response) = self.authorize(self.client.post(&url)).json(&request).send() else {
            return Decision::deny_default();
        };
        if !response.status().is_success() {
            return Decision::deny_default();
        }
        let Ok(decoded) = response.json::<DataResponse>() else {
            return Decision::deny_default();
        };
        decoded.result.map_or_else(Decision::deny_default, |verdict| {
            Decision::evaluated(verdict.allow)
        })
    }
}
