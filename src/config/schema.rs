//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config
//! files. Each section defaults to values suitable for local development.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the API service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings (scrape paths).
    pub observability: ObservabilityConfig,

    /// Session / bearer-token settings.
    pub auth: AuthConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Paths serving the metrics scrape payload. These are excluded from
    /// request instrumentation so that scraping never records itself.
    pub scrape_paths: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            scrape_paths: vec!["/api/metrics".to_string(), "/api/apps/metrics".to_string()],
        }
    }
}

/// Session / bearer-token settings.
///
/// The token table stands in for a hosted session service: each entry maps
/// a static bearer token to the user id it authenticates as.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token → user id.
    pub tokens: HashMap<String, String>,

    /// User id assumed for requests without a token. `None` rejects
    /// anonymous requests; the default keeps local development open.
    pub dev_user: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tokens: HashMap::new(),
            dev_user: Some("dev-user".to_string()),
        }
    }
}
