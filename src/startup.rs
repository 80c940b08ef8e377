//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including the store connection, the credential verifiers, and route setup.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes and runs the application server.
///
/// Connects the store once, builds the shared state and serves the router
/// on the configured address until the process is stopped.
///
/// # Errors
///
/// Returns an error if the store cannot be reached, the server fails to bind
/// to the specified address, or it encounters a runtime error.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.store).await?;
    let state = AppState::new(config.clone(), store);
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Career code running on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
