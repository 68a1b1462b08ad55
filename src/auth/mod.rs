//! Bearer-token management for upstream inventory calls

mod cache;
mod clock;

pub use cache::{Credential, DEFAULT_REFRESH_SKEW, TokenCache};
pub use clock::{Clock, SystemClock};

use async_trait::async_trait;

use crate::rapnet::{ClientCredentials, IssuedToken, RapnetClient, RapnetError};

/// Anything that can exchange client credentials for a bearer token
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_token(&self, credentials: &ClientCredentials)
    -> Result<IssuedToken, RapnetError>;
}

#[async_trait]
impl TokenIssuer for RapnetClient {
    async fn issue_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<IssuedToken, RapnetError> {
        self.fetch_token(credentials).await
    }
}
