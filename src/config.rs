// src/config.rs
//! Runtime settings read from the environment (and `.env`, when present).

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FLOW_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Where the remote flow lives and how to authenticate against it.
#[derive(Clone)]
pub struct FlowSettings {
    pub api_base: String,
    pub flow_id: String,
    pub endpoint_id: String,
    pub application_token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for FlowSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSettings")
            .field("api_base", &self.api_base)
            .field("flow_id", &self.flow_id)
            .field("endpoint_id", &self.endpoint_id)
            .field("application_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Managed database settings. Recognised so existing `.env` files keep
/// working; nothing connects with them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub keyspace: Option<String>,
    pub secure_bundle_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub session_ttl: Duration,
    pub flow: FlowSettings,
    pub database: DatabaseSettings,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let flow = FlowSettings {
            api_base: require("ASTRA_DB_API_ENDPOINT")?,
            flow_id: require("LANGFLOW_ID")?,
            endpoint_id: require("LANGFLOW_ENDPOINT")?,
            application_token: require("ASTRA_DB_APPLICATION_TOKEN")?,
            timeout: secs(get("FLOW_TIMEOUT_SECS"), "FLOW_TIMEOUT_SECS", DEFAULT_FLOW_TIMEOUT_SECS)?,
        };

        Ok(Self {
            bind_addr,
            session_ttl: secs(get("SESSION_TTL_SECS"), "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            flow,
            database: DatabaseSettings {
                keyspace: get("ASTRA_DB_KEYSPACE"),
                secure_bundle_path: get("ASTRA_DB_SECURE_BUNDLE_PATH").map(PathBuf::from),
            },
        })
    }
}

fn secs(raw: Option<String>, key: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(Duration::from_secs(n)),
        Err(e) => Err(ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
