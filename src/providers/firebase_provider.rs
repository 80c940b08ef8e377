#[allow(unused_imports)]
use cached::proc_macro::cached;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::models::Identity;
use crate::providers::{Provider, BEARER};

/// Google JWKS URL for Firebase Auth.
pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Firebase token issuer prefix.
const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

fn default_cert_uri() -> String {
    GOOGLE_JWKS_URL.to_string()
}

/// Firebase ID token verification settings.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct FirebaseProviderConfig {
    pub name: String,
    /// Firebase project id; tokens must carry it as `aud`.
    pub project_id: String,
    #[serde(default = "default_cert_uri")]
    pub cert_uri: String,
}

/// Provider that validates Firebase ID tokens against the published JWKS.
pub struct FirebaseProvider {
    pub config: FirebaseProviderConfig,
}

impl FirebaseProvider {
    pub fn new(config: &FirebaseProviderConfig) -> Self {
        info!(
            "Creating Firebase provider '{}' for project '{}'",
            config.name, config.project_id
        );
        Self {
            config: config.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[format!(
            "{}{}",
            FIREBASE_ISSUER_PREFIX, self.config.project_id
        )]);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait::async_trait]
impl Provider for FirebaseProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn get_type(&self) -> &str {
        BEARER
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, String> {
        let header =
            decode_header(token).map_err(|e| format!("Failed to decode JWT header: {}", e))?;
        if header.alg != Algorithm::RS256 {
            return Err(format!("Unsupported JWT algorithm: {:?}", header.alg));
        }
        let kid = header.kid.ok_or("Missing 'kid' in JWT header")?;

        // Fetch the JWK set (cached)
        let certs = get_certs(self.config.cert_uri.clone()).await?;
        let jwks: JwkSet = serde_json::from_str(&certs)
            .map_err(|e| format!("Failed to parse certificates: {}", e))?;
        let jwk = jwks.find(&kid).ok_or(format!(
            "Failed to find certificate with matching kid {}",
            kid
        ))?;
        let decoding_key = DecodingKey::from_jwk(jwk)
            .map_err(|e| format!("Failed to create decoding key from JWK: {}", e))?;

        let decoded = decode::<Map<String, Value>>(token, &decoding_key, &self.validation())
            .map_err(|e| format!("Token validation failed: {}", e))?;
        debug!("Firebase token verified for kid {}", kid);

        Ok(Identity::from_claims(&self.config.name, decoded.claims))
    }
}

/// Retrieves the certificates (JWKS) from a remote URI. Successful fetches
/// are cached for 600s.
#[cfg_attr(not(test), cached(time = 600, result = true, sync_writes = true))]
pub async fn get_certs(cert_uri: String) -> Result<String, String> {
    debug!("Fetching certificates from {}", cert_uri);
    let res = reqwest::get(&cert_uri)
        .await
        .map_err(|e| format!("Failed to download certificates: {}", e))?;

    if res.status().is_success() {
        let json: Value = res
            .json()
            .await
            .map_err(|e| format!("Failed to parse certificate JSON: {}", e))?;
        Ok(json.to_string())
    } else {
        Err(format!("Failed to download certificates: {}", res.status()))
    }
}
