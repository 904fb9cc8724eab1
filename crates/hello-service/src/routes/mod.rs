//! HTTP routes for Hello Service.
//!
//! Defines the Axum router and application state.

use crate::config::ServiceIdentity;
use crate::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Identity captured from the environment at startup.
    pub identity: ServiceIdentity,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Fixed greeting
/// - `/cluster` - Service and cluster identity
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::hello))
        .route("/cluster", get(handlers::cluster_identity))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    routes
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
