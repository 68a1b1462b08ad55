use crate::humanize::{ByteSize, HumanDuration};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rapnet: RapnetConfig,
    #[serde(default)]
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Directory served for `/`, `/product.html` and the SPA fallback
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_payload_bytes() -> ByteSize {
    ByteSize(1024 * 1024) // 1 MB
}

/// RapNet identity and inventory endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RapnetConfig {
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Tokens are renewed this long before their real expiry
    #[serde(default = "default_refresh_skew")]
    pub refresh_skew: HumanDuration,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    /// Loaded from `CLIENT_ID`, never from the config file
    #[serde(skip)]
    pub client_id: Option<String>,
    /// Loaded from `CLIENT_SECRET`, never from the config file
    #[serde(skip)]
    pub client_secret: Option<String>,
}

impl Default for RapnetConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            search_url: default_search_url(),
            refresh_skew: default_refresh_skew(),
            request_timeout: default_request_timeout(),
            client_id: None,
            client_secret: None,
        }
    }
}

fn default_auth_url() -> String {
    "https://authztoken.api.rapaport.com/api/get".to_string()
}

fn default_search_url() -> String {
    "https://technet.rapnetapis.com/instant-inventory/api/Diamonds".to_string()
}

fn default_refresh_skew() -> HumanDuration {
    HumanDuration::from_secs(5 * 60)
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration::from_secs(30)
}

/// Shopify Admin REST API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopifyConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Overrides `https://{store}/admin/api/{api_version}`
    pub api_base: Option<String>,
    /// Page size of the single SKU lookup request (Shopify caps it at 250)
    #[serde(default = "default_lookup_limit")]
    pub lookup_limit: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    /// Store domain, e.g. `my-shop.myshopify.com` (from `SHOPIFY_STORE`)
    #[serde(skip)]
    pub store: Option<String>,
    /// Admin API access token (from `SHOPIFY_ACCESS_TOKEN`)
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            api_base: None,
            lookup_limit: default_lookup_limit(),
            request_timeout: default_request_timeout(),
            store: None,
            access_token: None,
        }
    }
}

fn default_api_version() -> String {
    "2024-01".to_string()
}

fn default_lookup_limit() -> usize {
    250
}

impl ShopifyConfig {
    /// Base URL of the Admin API, if the store is configured
    pub fn admin_base_url(&self) -> Option<String> {
        if let Some(base) = &self.api_base {
            return Some(base.trim_end_matches('/').to_string());
        }
        self.store
            .as_ref()
            .map(|store| format!("https://{}/admin/api/{}", store, self.api_version))
    }
}

/// SMTP transport and inquiry notification settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    /// Implicit TLS (SMTPS) when true, STARTTLS otherwise
    #[serde(default)]
    pub smtp_secure: bool,
    pub from: Option<String>,
    /// Recipient of inquiry notifications
    pub owner_email: Option<String>,
    #[serde(skip)]
    pub smtp_user: Option<String>,
    #[serde(skip)]
    pub smtp_password: Option<String>,
}

/// Complete SMTP settings, only available when every field is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
    pub from: String,
}

impl MailConfig {
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        Some(SmtpSettings {
            host: non_empty(&self.smtp_host)?,
            port: self.smtp_port?,
            secure: self.smtp_secure,
            user: non_empty(&self.smtp_user)?,
            password: non_empty(&self.smtp_password)?,
            from: non_empty(&self.from)?,
        })
    }

    pub fn owner_address(&self) -> Option<String> {
        non_empty(&self.owner_email)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.server.max_payload_bytes.as_u64(), 1024 * 1024);
        assert_eq!(config.rapnet.refresh_skew.as_duration(), Duration::from_secs(300));
        assert_eq!(config.shopify.lookup_limit, 250);
        assert!(config.rapnet.client_id.is_none());
    }

    #[test]
    fn test_admin_base_url() {
        let mut shopify = ShopifyConfig::default();
        assert!(shopify.admin_base_url().is_none());

        shopify.store = Some("gems.myshopify.com".to_string());
        assert_eq!(
            shopify.admin_base_url().as_deref(),
            Some("https://gems.myshopify.com/admin/api/2024-01")
        );

        shopify.api_base = Some("http://127.0.0.1:9999/admin/".to_string());
        assert_eq!(
            shopify.admin_base_url().as_deref(),
            Some("http://127.0.0.1:9999/admin")
        );
    }

    #[test]
    fn test_smtp_settings_require_every_field() {
        let mut mail = MailConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: Some(587),
            smtp_secure: false,
            from: Some("shop@example.com".to_string()),
            owner_email: Some("owner@example.com".to_string()),
            smtp_user: Some("shop".to_string()),
            smtp_password: None,
        };
        assert!(mail.smtp_settings().is_none());

        mail.smtp_password = Some("  ".to_string());
        assert!(mail.smtp_settings().is_none());

        mail.smtp_password = Some("hunter2".to_string());
        let settings = mail.smtp_settings().unwrap();
        assert_eq!(settings.port, 587);
        assert_eq!(settings.user, "shop");
    }

    #[test]
    fn test_secrets_are_never_read_from_toml() {
        let config: Config = toml::from_str(
            r#"
[rapnet]
refresh_skew = "2m"
client_id = "from-file"

[shopify]
lookup_limit = 100
access_token = "from-file"
            "#,
        )
        .expect("Failed to parse test config");

        assert_eq!(config.rapnet.refresh_skew.as_duration(), Duration::from_secs(120));
        assert_eq!(config.shopify.lookup_limit, 100);
        assert!(config.rapnet.client_id.is_none());
        assert!(config.shopify.access_token.is_none());
    }
}
