//! Runtime parameters for the verification harness.
//!
//! Parameters are carried in an explicit [`HarnessConfig`] handed to each
//! suite constructor. Integration tests read them from the environment; the
//! `gitops-check` binary builds them from command-line flags.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Environment variable holding the responder endpoint (`host:port`).
pub const ENDPOINT_VAR: &str = "GITOPS_ENDPOINT";

/// Environment variable holding the kubeconfig context name.
pub const CONTEXT_VAR: &str = "GITOPS_CONTEXT";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing runtime parameter {flag} (or environment variable {var})")]
    MissingParameter {
        flag: &'static str,
        var: &'static str,
    },
}

/// Harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// `host:port` of the deployed responder.
    pub endpoint: Option<String>,

    /// Kubeconfig context selecting the target cluster. `None` uses the
    /// kubeconfig's current context.
    pub context: Option<String>,
}

impl HarnessConfig {
    pub fn new(endpoint: Option<String>, context: Option<String>) -> Self {
        Self {
            endpoint: endpoint.filter(|v| !v.trim().is_empty()),
            context: context.filter(|v| !v.trim().is_empty()),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        Self::new(
            vars.get(ENDPOINT_VAR).cloned(),
            vars.get(CONTEXT_VAR).cloned(),
        )
    }

    /// Responder endpoint, required by the end-to-end checks.
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        self.endpoint
            .as_deref()
            .ok_or(ConfigError::MissingParameter {
                flag: "--endpoint",
                var: ENDPOINT_VAR,
            })
    }

    /// Target cluster context, if one was given.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}
