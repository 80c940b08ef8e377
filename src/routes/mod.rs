//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! sessions, jobs, applications, and health checks.

mod application_routes;
mod health_routes;
mod job_routes;
mod session_routes;

use crate::config::CorsConfig;
use crate::state::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, attaches the
/// application state, and wraps it in request tracing and, when origins are
/// configured, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let router = Router::new()
        .merge(health_routes::routes())
        .merge(session_routes::routes())
        .merge(job_routes::routes())
        .merge(application_routes::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Credentialed CORS for the configured origins, so browsers send the
/// session cookie cross-origin.
fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
