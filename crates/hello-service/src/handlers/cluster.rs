//! Cluster identity handler.

use crate::routes::AppState;
use axum::extract::State;
use std::sync::Arc;
use tracing::instrument;

/// Cluster identity handler.
///
/// ## Response
///
/// `text/plain` body of the form:
///
/// ```text
/// This is service1 in cluster cluster1
/// ```
///
/// Both values come from the identity captured at startup.
#[instrument(skip_all, name = "hello.cluster_identity")]
pub async fn cluster_identity(State(state): State<Arc<AppState>>) -> String {
    state.identity.describe()
}
