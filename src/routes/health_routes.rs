//! Health check endpoints.

use crate::state::AppState;
use axum::{routing::get, Router};

/// Body of the root liveness probe.
pub const LIVENESS_MESSAGE: &str = "Career Code Cooking";

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Simple health check endpoint.
///
/// Returns a 200 OK status to indicate the service is running.
async fn health_check() -> &'static str {
    "OK"
}
