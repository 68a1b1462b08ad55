//! HTTP client for the RapNet identity and instant-inventory endpoints
//!
//! Both calls are single attempts. Failures are mapped to [`RapnetError`]
//! carrying whatever the upstream returned so callers can relay it.

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::error::{RapnetError, parse_body};
use super::models::{ClientCredentials, IssuedToken, SearchResponse};
use crate::config::RapnetConfig;

const USER_AGENT: &str = concat!("diamondproxy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct RapnetClient {
    http: Client,
    auth_url: String,
    search_url: String,
}

impl RapnetClient {
    pub fn new(config: &RapnetConfig) -> Result<Self, RapnetError> {
        let http = Client::builder()
            .timeout(config.request_timeout.as_duration())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RapnetError::Client(e.to_string()))?;

        Ok(Self {
            http,
            auth_url: config.auth_url.clone(),
            search_url: config.search_url.clone(),
        })
    }

    /// Exchange client credentials for a bearer token
    pub async fn fetch_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<IssuedToken, RapnetError> {
        debug!(url = %self.auth_url, client_id = %credentials.client_id, "Requesting access token");

        let response = self
            .http
            .post(&self.auth_url)
            .json(credentials)
            .send()
            .await
            .map_err(RapnetError::token_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(RapnetError::token_transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token endpoint rejected request");
            return Err(RapnetError::TokenFetch {
                status: Some(status.as_u16()),
                body: parse_body(&text),
            });
        }

        let issued: IssuedToken =
            serde_json::from_str(&text).map_err(|e| RapnetError::TokenFetch {
                status: Some(status.as_u16()),
                body: Value::String(format!("malformed token response: {e}")),
            })?;

        if issued.access_token.is_empty() {
            return Err(RapnetError::TokenFetch {
                status: Some(status.as_u16()),
                body: Value::String("token response has an empty access_token".to_string()),
            });
        }

        Ok(issued)
    }

    /// Run an inventory search, wrapping `params` as `{request: {body: params}}`
    pub async fn search(&self, token: &str, params: &Value) -> Result<SearchResponse, RapnetError> {
        let envelope = json!({ "request": { "body": params } });

        let response = self
            .http
            .post(&self.search_url)
            .bearer_auth(token)
            .json(&envelope)
            .send()
            .await
            .map_err(RapnetError::search_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(RapnetError::search_transport)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Inventory search failed upstream");
            return Err(RapnetError::Search {
                status: Some(status.as_u16()),
                body: parse_body(&text),
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| RapnetError::Search {
            status: None,
            body: Value::String(format!("inventory returned a non-JSON body: {e}")),
        })?;

        debug!(status = status.as_u16(), size = text.len(), "Inventory search completed");

        Ok(SearchResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RapnetClient {
        let config = RapnetConfig {
            auth_url: format!("{}/api/get", server.uri()),
            search_url: format!("{}/instant-inventory/api/Diamonds", server.uri()),
            ..RapnetConfig::default()
        };
        RapnetClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_token_posts_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get"))
            .and(body_json(json!({"client_id": "id", "client_secret": "secret"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok-1", "expires_in": 3600})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let issued = client
            .fetch_token(&ClientCredentials::new("id", "secret"))
            .await
            .unwrap();

        assert_eq!(issued.access_token, "tok-1");
        assert_eq!(issued.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_fetch_token_accepts_string_lifetime() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok-2", "expires_in": "3600"})),
            )
            .mount(&server)
            .await;

        let issued = client_for(&server)
            .fetch_token(&ClientCredentials::new("id", "secret"))
            .await
            .unwrap();

        assert_eq!(issued.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_fetch_token_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/get"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_token(&ClientCredentials::new("id", "wrong"))
            .await
            .unwrap_err();

        match err {
            RapnetError::TokenFetch { status, body } => {
                assert_eq!(status, Some(401));
                assert_eq!(body, json!({"error": "invalid_client"}));
            }
            other => panic!("expected TokenFetch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_token_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "nope"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_token(&ClientCredentials::new("id", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, RapnetError::TokenFetch { status: Some(200), .. }));
    }

    #[tokio::test]
    async fn test_search_wraps_params_and_sends_bearer() {
        let server = MockServer::start().await;
        let upstream = json!({"response": {"body": {"diamonds": [], "search_results": {"total_diamonds_found": 0}}}});

        Mock::given(method("POST"))
            .and(path("/instant-inventory/api/Diamonds"))
            .and(header("authorization", "Bearer tok-1"))
            .and(body_json(json!({"request": {"body": {"shapes": ["Round"]}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .search("tok-1", &json!({"shapes": ["Round"]}))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, upstream);
    }

    #[tokio::test]
    async fn test_search_upstream_error_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("tok", &json!({})).await.unwrap_err();

        assert_eq!(err.upstream_status(), Some(503));
        assert_eq!(err.details(), json!("maintenance"));
    }

    #[tokio::test]
    async fn test_search_transport_failure_has_no_status() {
        let config = RapnetConfig {
            search_url: "http://127.0.0.1:9/unreachable".to_string(),
            ..RapnetConfig::default()
        };
        let client = RapnetClient::new(&config).unwrap();

        let err = client.search("tok", &json!({})).await.unwrap_err();
        assert!(matches!(err, RapnetError::Search { status: None, .. }));
    }
}
