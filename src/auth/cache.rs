//! Access-token cache guarding every inventory call
//!
//! One [`Credential`] per cache, replaced wholesale on refresh. A credential
//! is served while `now < expires_at - refresh_skew`; at or past that instant
//! the next caller refreshes it. Refreshes are single-flight: callers queue on
//! an async mutex and re-check the cache once they hold it, so a burst of
//! requests against an expired token produces one upstream call.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::TokenIssuer;
use super::clock::{Clock, SystemClock};
use crate::observability::Metrics;
use crate::rapnet::{ClientCredentials, RapnetError};

/// Default safety margin before real expiry
pub const DEFAULT_REFRESH_SKEW: Duration = Duration::from_secs(5 * 60);

/// A bearer token and the instant it stops being accepted
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Usable for new requests: strictly before `expires_at - skew`
    pub fn is_usable(&self, now: DateTime<Utc>, skew: TimeDelta) -> bool {
        self.expires_at
            .checked_sub_signed(skew)
            .is_some_and(|deadline| now < deadline)
    }

    /// Not yet past its real expiry
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct TokenCache {
    issuer: Arc<dyn TokenIssuer>,
    credentials: Option<ClientCredentials>,
    clock: Arc<dyn Clock>,
    refresh_skew: TimeDelta,
    current: RwLock<Option<Credential>>,
    refresh_lock: Mutex<()>,
    metrics: Option<Arc<Metrics>>,
}

impl TokenCache {
    /// Create an empty cache. Without credentials every refresh fails with
    /// [`RapnetError::MissingCredentials`].
    pub fn new(
        issuer: Arc<dyn TokenIssuer>,
        credentials: Option<ClientCredentials>,
        refresh_skew: Duration,
    ) -> Self {
        let refresh_skew = TimeDelta::from_std(refresh_skew).unwrap_or_else(|_| {
            TimeDelta::from_std(DEFAULT_REFRESH_SKEW).unwrap_or(TimeDelta::zero())
        });

        Self {
            issuer,
            credentials,
            clock: Arc::new(SystemClock),
            refresh_skew,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            metrics: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Return a usable bearer token, refreshing it first if needed
    ///
    /// # Errors
    ///
    /// Propagates the issuer's failure. The cached credential is left as it
    /// was, so a still-live token keeps being reported by [`Self::is_valid`].
    pub async fn get_token(&self) -> Result<String, RapnetError> {
        if let Some(token) = self.usable_token(self.clock.now()).await {
            debug!("Access token cache hit");
            return Ok(token);
        }

        let _refreshing = self.refresh_lock.lock().await;

        // A concurrent caller may have refreshed while we waited for the lock
        let now = self.clock.now();
        if let Some(token) = self.usable_token(now).await {
            debug!("Access token refreshed by concurrent caller");
            return Ok(token);
        }

        let credential = self.refresh(now).await?;
        let token = credential.token().to_string();
        *self.current.write().await = Some(credential);

        Ok(token)
    }

    async fn refresh(&self, now: DateTime<Utc>) -> Result<Credential, RapnetError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(RapnetError::MissingCredentials)?;

        let issued = match self.issuer.issue_token(credentials).await {
            Ok(issued) => issued,
            Err(err) => {
                warn!(error = %err, status = ?err.upstream_status(), details = %err.details(), "Error fetching access token");
                return Err(err);
            }
        };

        let expires_at = TimeDelta::try_seconds(issued.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| RapnetError::TokenFetch {
                status: None,
                body: serde_json::Value::String(format!(
                    "token lifetime out of range: {}",
                    issued.expires_in
                )),
            })?;

        if let Some(metrics) = &self.metrics {
            metrics.token_refreshed();
        }
        info!(expires_in = issued.expires_in, "New access token obtained");

        Ok(Credential::new(issued.access_token, expires_at))
    }

    async fn usable_token(&self, now: DateTime<Utc>) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|credential| credential.is_usable(now, self.refresh_skew))
            .map(|credential| credential.token().to_string())
    }

    /// Whether a token is cached and not past its real expiry (skew ignored)
    pub async fn is_valid(&self) -> bool {
        let now = self.clock.now();
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|credential| credential.is_live(now))
    }

    /// Copy of the cached credential
    pub async fn snapshot(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("credentials", &self.credentials)
            .field("refresh_skew", &self.refresh_skew)
            .finish_non_exhaustive()
    }
}
