//! Client configuration.
//!
//! A single `ClientConfig` carries the REST base URL, the push-channel URL,
//! and the timing knobs shared by the network layer and the CLI. Parsing is
//! kept public so tests can exercise validation without touching disk or
//! network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, is_ws_url, normalize_text_option};

const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Quiet period after the last push event before the authoritative re-fetch.
pub const DEFAULT_SETTLE_MS: u64 = 1_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// How long a cached snapshot stays usable for offline listing.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Runtime configuration for the vetsync client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// REST API base, e.g. `https://api.clinic.example`.
    pub api_base_url: String,
    /// Push-channel endpoint; `None` means snapshot-only operation.
    #[serde(default)]
    pub push_url: Option<String>,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

const fn default_schema_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

const fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl ClientConfig {
    /// Build a config from a base URL, applying defaults for everything else.
    pub fn new(api_base_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            api_base_url: api_base_url.into(),
            push_url: None,
            settle_ms: DEFAULT_SETTLE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        };
        config.validated()
    }

    pub fn with_push_url(mut self, push_url: impl Into<String>) -> Result<Self> {
        self.push_url = Some(push_url.into());
        self.validated()
    }

    /// Trim and validate every field, returning the normalized config.
    pub fn validated(mut self) -> Result<Self> {
        if self.schema_version != CONFIG_SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "unsupported config schema_version {} (expected {CONFIG_SCHEMA_VERSION})",
                self.schema_version
            )));
        }

        self.api_base_url = normalize_text_option(Some(self.api_base_url))
            .ok_or_else(|| Error::Config("api_base_url must not be empty".to_string()))?;
        if !is_http_url(&self.api_base_url) {
            return Err(Error::Config(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();

        if let Some(push_url) = normalize_text_option(self.push_url.take()) {
            // socket servers commonly advertise http(s) URLs; both are accepted.
            if !is_ws_url(&push_url) && !is_http_url(&push_url) {
                return Err(Error::Config(
                    "push_url must include ws://, wss://, http:// or https://".to_string(),
                ));
            }
            self.push_url = Some(push_url.trim_end_matches('/').to_string());
        }

        if self.settle_ms == 0 {
            return Err(Error::Config("settle_ms must be positive".to_string()));
        }

        Ok(self)
    }

    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Parse a config from a raw JSON payload.
pub fn parse_client_config(payload: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_json::from_str(payload)
        .map_err(|error| Error::Config(format!("invalid config JSON: {error}")))?;
    config.validated()
}
