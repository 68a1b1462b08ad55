use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::config::RapnetConfig;

/// Client id/secret pair presented to the identity endpoint
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Both halves from configuration, if set
    pub fn from_config(config: &RapnetConfig) -> Option<Self> {
        let client_id = config.client_id.as_deref().filter(|v| !v.is_empty())?;
        let client_secret = config.client_secret.as_deref().filter(|v| !v.is_empty())?;
        Some(Self::new(client_id, client_secret))
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Identity endpoint response
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(deserialize_with = "crate::numeric::seconds")]
    pub expires_in: i64,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Successful inventory search, relayed to callers unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: u16,
    pub body: Value,
}
