//! Responder client fixture for end-to-end checks.
//!
//! Issues single GET requests against `http://{endpoint}`. There is no retry:
//! an unreachable endpoint fails the check immediately.

use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

/// Substring the index page must contain.
pub const GREETING: &str = "hello";

/// Pattern of the `/cluster` body. Anchored at the start only.
static CLUSTER_IDENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^This is (\w+) in cluster (\w+)").unwrap());

/// Maximum length for response body in error messages.
const MAX_ERROR_BODY_LEN: usize = 256;

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => format!("{}...[truncated]", &body[..idx]),
        None => body.to_string(),
    }
}

/// Responder client errors.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}: {body}")]
    RequestFailed {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Body of {url} does not contain {expected:?}: {body}")]
    MissingSubstring {
        url: String,
        expected: &'static str,
        body: String,
    },

    #[error("Body of {url} does not match the cluster identity pattern: {body}")]
    PatternMismatch { url: String, body: String },
}

/// Identity reported by `/cluster`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    pub name: String,
    pub cluster: String,
}

impl ClusterIdentity {
    /// Parse a `/cluster` body.
    pub fn parse(body: &str) -> Option<Self> {
        let captures = CLUSTER_IDENTITY_PATTERN.captures(body)?;
        Some(Self {
            name: captures.get(1)?.as_str().to_string(),
            cluster: captures.get(2)?.as_str().to_string(),
        })
    }
}

/// Client for the deployed responder.
pub struct ResponderClient {
    base_url: String,
    http_client: Client,
}

impl ResponderClient {
    /// Create a client for `endpoint` (`host:port`).
    pub fn new(endpoint: &str) -> Self {
        Self {
            base_url: format!("http://{}", endpoint.trim_end_matches('/')),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_body(&self, path: &str) -> Result<(String, String), ResponderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ResponderError::RequestFailed {
                url,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        debug!(url = %url, status = status.as_u16(), "Responder answered");
        Ok((url, body))
    }

    /// `GET /` and require the greeting. Returns the body.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn check_index(&self) -> Result<String, ResponderError> {
        let (url, body) = self.get_body("/").await?;

        if !body.contains(GREETING) {
            return Err(ResponderError::MissingSubstring {
                url,
                expected: GREETING,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    /// `GET /cluster` and require the identity line.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn check_cluster(&self) -> Result<ClusterIdentity, ResponderError> {
        let (url, body) = self.get_body("/cluster").await?;

        ClusterIdentity::parse(&body).ok_or_else(|| ResponderError::PatternMismatch {
            url,
            body: truncate_body(&body),
        })
    }
}
