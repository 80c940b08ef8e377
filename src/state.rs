//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, the credential verifiers, the session issuer and the
//! document store.

use crate::auth::Auth;
use crate::config::ConfigV1;
use crate::providers::session_provider::SessionProvider;
use crate::store::Store;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; every field is a shared
/// handle created once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Every provider a gate may consult.
    pub auth: Arc<Auth>,
    /// Issuer of the session cookie; also registered in `auth`.
    pub session: Arc<SessionProvider>,
    /// The single store connection used by all requests.
    pub store: Arc<dyn Store>,
}

impl AppState {
    /// Wires state from configuration and an already connected store.
    pub fn new(config: Arc<ConfigV1>, store: Arc<dyn Store>) -> Self {
        let session = Arc::new(SessionProvider::new(&config.session));
        let auth = Arc::new(Auth::new(&config.providers, session.clone()));
        AppState {
            config,
            auth,
            session,
            store,
        }
    }
}
