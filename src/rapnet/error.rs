use serde_json::Value;
use thiserror::Error;

/// Failures talking to the RapNet identity and inventory endpoints
///
/// `status` is the upstream HTTP status when a response was received and
/// `body` carries the upstream payload (or the transport message).
#[derive(Debug, Error)]
pub enum RapnetError {
    #[error("RapNet client credentials are not configured")]
    MissingCredentials,

    #[error("failed to obtain access token")]
    TokenFetch { status: Option<u16>, body: Value },

    #[error("failed to search diamonds")]
    Search { status: Option<u16>, body: Value },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl RapnetError {
    pub(crate) fn token_transport(err: reqwest::Error) -> Self {
        RapnetError::TokenFetch {
            status: None,
            body: Value::String(err.to_string()),
        }
    }

    pub(crate) fn search_transport(err: reqwest::Error) -> Self {
        RapnetError::Search {
            status: None,
            body: Value::String(err.to_string()),
        }
    }

    /// Upstream HTTP status, if one was received
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RapnetError::TokenFetch { status, .. } | RapnetError::Search { status, .. } => *status,
            _ => None,
        }
    }

    /// Upstream body or failure message
    pub fn details(&self) -> Value {
        match self {
            RapnetError::TokenFetch { body, .. } | RapnetError::Search { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// Keeps JSON error bodies structured and falls back to the raw text
pub(crate) fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_prefers_json() {
        assert_eq!(parse_body(r#"{"error":"bad"}"#), json!({"error": "bad"}));
        assert_eq!(parse_body("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_details_and_status() {
        let err = RapnetError::Search {
            status: Some(401),
            body: json!({"message": "expired"}),
        };
        assert_eq!(err.upstream_status(), Some(401));
        assert_eq!(err.details(), json!({"message": "expired"}));

        let err = RapnetError::MissingCredentials;
        assert_eq!(err.upstream_status(), None);
        assert_eq!(err.details(), json!("RapNet client credentials are not configured"));
    }
}
