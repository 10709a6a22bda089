// crates/policy-helm-config/src/lib.rs
// ============================================================================
// Module: Policy Helm Config
// Description: Canonical configuration model with strict load guards.
// Purpose: Load and validate control-plane settings from TOML.
// Dependencies: policy-helm-store, policy-helm-sync, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration for the policy lifecycle layer: the engine endpoint, the
//! sync fan-out limits, and the registered sync targets. Loading is strict
//! and fail-closed: over-long paths, oversized files, non-UTF-8 content, and
//! unknown fields are all rejected before any value is used.
//! Invariants:
//! - `load(None)` yields validated defaults (local engine, no targets).
//! - Every loaded config passes `validate` before it is returned.
//! - A loaded config can construct the runtime pieces it describes (the
//!   engine client and an HTTP-backed sync trigger).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use policy_helm_store::ClientError;
use policy_helm_store::EngineClient;
use policy_helm_store::EngineConfig;
use policy_helm_sync::HttpNotifier;
use policy_helm_sync::NotifyError;
use policy_helm_sync::SyncTarget;
use policy_helm_sync::SyncTrigger;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted config path length in bytes.
const MAX_PATH_BYTES: usize = 4_096;

/// Maximum accepted path component length in bytes.
const MAX_COMPONENT_BYTES: usize = 255;

/// Maximum accepted config file size in bytes (1 MiB).
const MAX_FILE_BYTES: u64 = 1_048_576;

/// Upper bound for configured timeouts in milliseconds.
const MAX_TIMEOUT_MS: u64 = 600_000;

/// Upper bound for fan-out concurrency.
const MAX_CONCURRENCY: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config path exceeds the accepted length.
    #[error("config path exceeds max length")]
    PathTooLong,
    /// A config path component exceeds the accepted length.
    #[error("config path component too long")]
    PathComponentTooLong,
    /// Config file exceeds the accepted size.
    #[error("config file exceeds size limit")]
    FileTooLarge,
    /// Config file is not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// Filesystem access failed.
    #[error("config read failed: {0}")]
    Io(String),
    /// TOML parsing or schema mismatch.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A value failed semantic validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Sync fan-out settings and registered targets.
///
/// # Invariants
/// - `timeout_ms` bounds each notifier call; `max_concurrency` bounds the
///   fan-out batch size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Per-notification timeout in milliseconds.
    #[serde(default = "default_sync_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum targets notified concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Registered enforcement agents.
    #[serde(default)]
    pub targets: Vec<SyncTarget>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_sync_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            targets: Vec::new(),
        }
    }
}

/// Default per-notification timeout.
const fn default_sync_timeout_ms() -> u64 {
    3_000
}

/// Default fan-out batch size.
const fn default_max_concurrency() -> usize {
    4
}

/// Root configuration for the policy lifecycle layer.
///
/// # Invariants
/// - Always validated before being handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyHelmConfig {
    /// Engine client settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Sync fan-out settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl PolicyHelmConfig {
    /// Loads configuration from an optional path.
    ///
    /// `None` yields validated defaults. A provided path is subject to the
    /// strict guards documented on [`ConfigError`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any guard or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        check_path(path)?;
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_FILE_BYTES {
            return Err(ConfigError::FileTooLarge);
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > MAX_FILE_BYTES {
            return Err(ConfigError::FileTooLarge);
        }
        let text = String::from_utf8(bytes).map_err(|_invalid| ConfigError::NotUtf8)?;
        let config: Self =
            toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every configured value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_endpoint("engine.base_url", &self.engine.base_url)?;
        check_timeout("engine.timeout_ms", self.engine.timeout_ms)?;
        check_timeout("sync.timeout_ms", self.sync.timeout_ms)?;
        if self.sync.max_concurrency == 0 || self.sync.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Invalid(format!(
                "sync.max_concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        for target in &self.sync.targets {
            if target.name.trim().is_empty() {
                return Err(ConfigError::Invalid("sync target name must not be empty".to_string()));
            }
            check_endpoint(&format!("sync target {}", target.name), &target.endpoint)?;
        }
        Ok(())
    }

    /// Builds the engine client described by the `[engine]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the configured endpoint is rejected or
    /// the HTTP client cannot be constructed.
    pub fn engine_client(&self) -> Result<EngineClient, ClientError> {
        EngineClient::new(self.engine.clone())
    }

    /// Builds an HTTP-backed sync trigger from the `[sync]` section.
    ///
    /// The configured `sync.timeout_ms` bounds each notification and
    /// `sync.max_concurrency` bounds the fan-out batch size.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the HTTP notifier cannot be
    /// constructed.
    pub fn sync_trigger(&self) -> Result<SyncTrigger, NotifyError> {
        let notifier = HttpNotifier::with_timeout(Duration::from_millis(self.sync.timeout_ms))?;
        Ok(SyncTrigger::with_concurrency(Arc::new(notifier), self.sync.max_concurrency))
    }
}

// ============================================================================
// SECTION: Guards
// ============================================================================

/// Enforces path length guards before any filesystem access.
fn check_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.len() > MAX_PATH_BYTES {
        return Err(ConfigError::PathTooLong);
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_COMPONENT_BYTES {
            return Err(ConfigError::PathComponentTooLong);
        }
    }
    Ok(())
}

/// Validates an HTTP endpoint value.
fn check_endpoint(label: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{label} is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::Invalid(format!("{label} has unsupported scheme: {scheme}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{label} must not embed credentials")));
    }
    Ok(())
}

/// Validates a timeout value in milliseconds.
fn check_timeout(label: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid(format!(
            "{label} must be between 1 and {MAX_TIMEOUT_MS} milliseconds"
        )));
    }
    Ok(())
}
