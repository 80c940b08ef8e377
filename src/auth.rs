use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::Identity;
use crate::providers::session_provider::SessionProvider;
use crate::providers::{create_auth_provider, Provider, ProviderConfig};

/// Holds every credential verifier the service accepts.
///
/// - `providers`: configured bearer verifiers (Firebase, plain tokens) plus
///   the session provider, which is always registered for cookie credentials.
///
/// Providers are selected by credential type, so a gate only ever consults
/// verifiers for the kind of credential it extracted.
pub struct Auth {
    pub providers: Vec<Box<dyn Provider>>,
}

impl Auth {
    /// Creates a new `Auth` instance from the provider configs and the session provider.
    pub fn new(provider_config: &[ProviderConfig], session: Arc<SessionProvider>) -> Self {
        info!("Creating auth providers...");
        let providers = provider_config
            .iter()
            .map(create_auth_provider)
            .chain(std::iter::once(Box::new(session) as Box<dyn Provider>))
            .collect();

        Auth { providers }
    }

    /// Builds an `Auth` from already constructed providers.
    #[cfg(test)]
    pub fn with_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Auth { providers }
    }

    /// Tries every provider whose type matches `auth_type` (case-insensitive),
    /// in order, returning the first identity produced.
    pub async fn authenticate(
        &self,
        auth_type: &str,
        credentials: &str,
        ip: &str,
    ) -> Option<Identity> {
        debug!(
            "Authenticating with auth_type='{}' from IP='{}'",
            auth_type, ip
        );

        let valid_providers: Vec<&Box<dyn Provider>> = self
            .providers
            .iter()
            .filter(|provider| provider.get_type().eq_ignore_ascii_case(auth_type))
            .collect();

        if valid_providers.is_empty() {
            warn!("No providers found for auth type: '{}'", auth_type);
            return None;
        }

        for provider in valid_providers {
            match provider.authenticate(credentials).await {
                Ok(identity) => {
                    info!(
                        "Provider '{}' authenticated '{}'",
                        provider.get_name(),
                        identity.email.as_deref().unwrap_or("<no email>")
                    );
                    return Some(identity);
                }
                Err(e) => {
                    debug!(
                        "Provider '{}' failed to authenticate: {}",
                        provider.get_name(),
                        e
                    );
                }
            }
        }

        warn!("All '{}' providers failed; no authentication succeeded.", auth_type);
        None
    }
}
