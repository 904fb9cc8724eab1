//! Hello Service configuration.
//!
//! Configuration is loaded once from environment variables at startup and
//! never changes for the lifetime of the process.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Service name reported by `/cluster` when `NAME` is unset.
pub const DEFAULT_SERVICE_NAME: &str = "service1";

/// Cluster name reported by `/cluster` when `CLUSTER` is unset.
pub const DEFAULT_CLUSTER_NAME: &str = "cluster1";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

/// Default drain period after a shutdown signal.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Identity of this service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    /// Logical service name (`NAME`).
    pub name: String,

    /// Cluster the instance is deployed to (`CLUSTER`).
    pub cluster: String,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster: cluster.into(),
        }
    }

    /// Human-readable identity line served by `/cluster`.
    pub fn describe(&self) -> String {
        format!("This is {} in cluster {}", self.name, self.cluster)
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME, DEFAULT_CLUSTER_NAME)
    }
}

/// Hello Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity reported by `/cluster`.
    pub identity: ServiceIdentity,

    /// Server bind address (default: "0.0.0.0:5000").
    pub bind_address: SocketAddr,

    /// Seconds to keep serving in-flight requests after SIGTERM (default: 0).
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBindAddress { value: String, reason: String },

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        // Empty values fall back to the defaults so `/cluster` never renders blank words
        let name = non_empty(vars, "NAME").unwrap_or(DEFAULT_SERVICE_NAME);
        let cluster = non_empty(vars, "CLUSTER").unwrap_or(DEFAULT_CLUSTER_NAME);

        let bind_value = non_empty(vars, "BIND_ADDRESS").unwrap_or(DEFAULT_BIND_ADDRESS);
        let bind_address: SocketAddr =
            bind_value
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                    value: bind_value.to_string(),
                    reason: e.to_string(),
                })?;

        let drain_seconds = if let Some(value_str) = vars.get("DRAIN_SECONDS") {
            value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        Ok(Config {
            identity: ServiceIdentity::new(name, cluster),
            bind_address,
            drain_seconds,
        })
    }
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}
