use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The caller as established by one of the authentication providers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Identity {
    /// Name of the provider that verified the credential.
    pub provider: String,
    pub subject: Option<String>,
    pub email: Option<String>,
    /// Every claim carried by the credential, verbatim.
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl Identity {
    /// Builds an identity from decoded token claims. `sub` is preferred for
    /// the subject, falling back to `uid`.
    pub fn from_claims(provider: &str, claims: Map<String, Value>) -> Self {
        let claim_str = |key: &str| claims.get(key).and_then(Value::as_str).map(str::to_string);
        let subject = claim_str("sub").or_else(|| claim_str("uid"));
        let email = claim_str("email");
        Identity {
            provider: provider.to_string(),
            subject,
            email,
            claims,
        }
    }

    /// True when the identity carries an email claim equal to `email`.
    pub fn owns(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }
}
