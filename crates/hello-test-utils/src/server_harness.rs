//! Test server harness for E2E testing
//!
//! Provides `TestHelloServer` for spawning real Hello Service instances in tests.

use hello_service::config::Config;
use hello_service::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning Hello Service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_cluster_identity() -> Result<(), anyhow::Error> {
///     let server = TestHelloServer::spawn(&[("NAME", "flask"), ("CLUSTER", "cluster2")]).await?;
///
///     let body = reqwest::get(format!("{}/cluster", server.url())).await?.text().await?;
///     assert_eq!(body, "This is flask in cluster cluster2");
///     Ok(())
/// }
/// ```
pub struct TestHelloServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestHelloServer {
    /// Spawn a server with no identity variables set (defaults apply).
    pub async fn spawn_default() -> Result<Self, anyhow::Error> {
        Self::spawn(&[]).await
    }

    /// Spawn a new test server instance.
    ///
    /// The server will:
    /// - Load configuration from `env` exactly like production does from the process environment
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn(env: &[(&str, &str)]) -> Result<Self, anyhow::Error> {
        let mut vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string());

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(AppState {
            identity: config.identity.clone(),
        });

        // Build routes using hello-service's real route builder
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind(config.bind_address)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the `host:port` endpoint, the form cluster tests receive via `--endpoint`.
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestHelloServer {
    fn drop(&mut self) {
        // Abort the HTTP server task so the port is released when the test ends
        self._handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_spawns_successfully() -> Result<(), anyhow::Error> {
        let server = TestHelloServer::spawn_default().await?;

        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert_eq!(server.endpoint(), server.addr().to_string());

        let response = reqwest::get(format!("{}/", server.url())).await?;
        assert_eq!(response.status(), 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_server_applies_identity_vars() -> Result<(), anyhow::Error> {
        let server = TestHelloServer::spawn(&[("NAME", "service2"), ("CLUSTER", "cluster3")]).await?;

        assert_eq!(server.config().identity.name, "service2");
        assert_eq!(server.config().identity.cluster, "cluster3");

        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_servers_get_distinct_ports() -> Result<(), anyhow::Error> {
        let first = TestHelloServer::spawn_default().await?;
        let second = TestHelloServer::spawn_default().await?;

        assert_ne!(first.addr(), second.addr());

        Ok(())
    }
}
