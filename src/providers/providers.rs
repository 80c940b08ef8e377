use super::{
    firebase_provider::{FirebaseProvider, FirebaseProviderConfig},
    plain_provider::{PlainTokenConfig, PlainTokenProvider},
};
use crate::models::Identity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Credential type of tokens sent as `Authorization: Bearer <token>`.
pub const BEARER: &str = "Bearer";

/// Credential type of the locally issued token carried in the session cookie.
pub const SESSION: &str = "Session";

/// Configuration options for each bearer-token provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "firebase")]
    Firebase(FirebaseProviderConfig),
    #[serde(rename = "plain")]
    Plain(PlainTokenConfig),
}

/// A credential verifier. `Auth` dispatches to every provider whose
/// `get_type` matches the credential type presented by the request.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_type(&self) -> &str;
    async fn authenticate(&self, credentials: &str) -> Result<Identity, String>;
}

/// Create an authentication provider from a given config.
pub fn create_auth_provider(config: &ProviderConfig) -> Box<dyn Provider> {
    match config {
        ProviderConfig::Firebase(cfg) => Box::new(FirebaseProvider::new(cfg)),
        ProviderConfig::Plain(cfg) => Box::new(PlainTokenProvider::new(cfg)),
    }
}
