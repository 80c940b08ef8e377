use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Identity;
use crate::providers::{Provider, BEARER};

/// Static bearer tokens, for local development and tests.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainTokenConfig {
    /// A friendly name for logs.
    pub name: String,
    pub tokens: Vec<PlainTokenEntry>,
}

/// One accepted token and the identity it stands for.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PlainTokenEntry {
    pub token: String,
    pub email: String,
    pub subject: Option<String>,
}

pub struct PlainTokenProvider {
    pub config: PlainTokenConfig,
}

impl PlainTokenProvider {
    pub fn new(config: &PlainTokenConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider for PlainTokenProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        BEARER
    }

    async fn authenticate(&self, credentials: &str) -> Result<Identity, String> {
        let entry = self
            .config
            .tokens
            .iter()
            .find(|entry| entry.token == credentials)
            .ok_or_else(|| "Unknown token".to_string())?;

        debug!("Plain token matched for '{}'", entry.email);
        let mut claims = Map::new();
        claims.insert("email".to_string(), Value::from(entry.email.clone()));
        if let Some(subject) = &entry.subject {
            claims.insert("sub".to_string(), Value::from(subject.clone()));
        }
        Ok(Identity::from_claims(&self.config.name, claims))
    }
}
