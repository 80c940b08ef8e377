use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::SessionConfig;
use crate::models::Identity;
use crate::providers::{Provider, SESSION};

/// Issues and verifies the HS256 session tokens handed out by `POST /jwt`.
pub struct SessionProvider {
    config: SessionConfig,
}

impl SessionProvider {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn secure_cookie(&self) -> bool {
        self.config.secure
    }

    /// Signs `payload` into a token that expires `exp` seconds from now.
    /// Any `iat`/`exp` already present in the payload are replaced.
    pub fn issue(&self, mut payload: Map<String, Value>) -> Result<String, String> {
        let now = Utc::now().timestamp();
        payload.insert("iat".to_string(), Value::from(now));
        payload.insert("exp".to_string(), Value::from(now + self.config.exp));

        let encoding_key = EncodingKey::from_secret(self.config.secret.as_ref());
        encode(&Header::new(Algorithm::HS256), &payload, &encoding_key)
            .map_err(|e| format!("Failed to encode session token: {}", e))
    }

    /// Checks signature and expiry, returning the signed payload.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, String> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The payload is caller-chosen, so an `aud` claim carries no meaning here.
        validation.validate_aud = false;

        decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid session token: {}", e))
    }
}

#[async_trait]
impl Provider for Arc<SessionProvider> {
    fn get_name(&self) -> &str {
        "session"
    }

    fn get_type(&self) -> &str {
        SESSION
    }

    async fn authenticate(&self, credentials: &str) -> Result<Identity, String> {
        let claims = self.verify(credentials)?;
        debug!("Session token verified");
        Ok(Identity::from_claims(self.get_name(), claims))
    }
}
