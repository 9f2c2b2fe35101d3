//! Registry credentials and the encoded auth token sent to the engine

use crate::error::{PusherError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};

/// A resolved username/secret pair. Both empty means anonymous.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.secret.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &if self.secret.is_empty() { "" } else { "***" })
            .finish()
    }
}

// Field names follow the engine's auth config JSON.
#[derive(Serialize, Deserialize)]
struct AuthPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    password: String,
}

/// URL-safe base64 of the auth config JSON, attached to one push request.
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn encode(credentials: &Credentials) -> Result<Self> {
        let payload = AuthPayload {
            username: credentials.username.clone(),
            password: credentials.secret.clone(),
        };
        let json = serde_json::to_vec(&payload)?;
        Ok(AuthToken(URL_SAFE.encode(json)))
    }

    pub fn decode(token: &str) -> Result<Credentials> {
        let json = URL_SAFE
            .decode(token)
            .map_err(|e| PusherError::Authentication(format!("Invalid auth token encoding: {}", e)))?;
        let payload: AuthPayload = serde_json::from_slice(&json)?;
        Ok(Credentials::new(payload.username, payload.password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthToken(<{} bytes>)", self.0.len())
    }
}
