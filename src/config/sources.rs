use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "DIAMONDPROXY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/diamondproxy.toml";
const ENV_PREFIX: &str = "DIAMONDPROXY";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    apply_secrets(&mut config, |key| env::var(key).ok())?;

    Ok(config)
}

/// Fill deployment secrets from a key lookup (the process environment in
/// production). Secrets never come from TOML files.
pub fn apply_secrets<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = get("CLIENT_ID") {
        config.rapnet.client_id = Some(value);
    }
    if let Some(value) = get("CLIENT_SECRET") {
        config.rapnet.client_secret = Some(value);
    }

    if let Some(value) = get("SHOPIFY_STORE") {
        config.shopify.store = Some(value);
    }
    if let Some(value) = get("SHOPIFY_ACCESS_TOKEN") {
        config.shopify.access_token = Some(value);
    }

    if let Some(value) = get("SMTP_HOST") {
        config.mail.smtp_host = Some(value);
    }
    if let Some(value) = get("SMTP_PORT") {
        let port = value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Message(format!("SMTP_PORT is not a valid port: {value}")))?;
        config.mail.smtp_port = Some(port);
    }
    if let Some(value) = get("SMTP_SECURE") {
        config.mail.smtp_secure = matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes");
    }
    if let Some(value) = get("SMTP_USER") {
        config.mail.smtp_user = Some(value);
    }
    if let Some(value) = get("SMTP_PASS") {
        config.mail.smtp_password = Some(value);
    }
    if let Some(value) = get("SMTP_FROM") {
        config.mail.from = Some(value);
    }
    if let Some(value) = get("OWNER_EMAIL") {
        config.mail.owner_email = Some(value);
    }

    // PORT keeps the bind host and only swaps the port
    if let Some(value) = get("PORT") {
        let port = value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {value}")))?;
        config.server.bind_addr = SocketAddr::new(config.server.bind_addr.ip(), port);
    }

    Ok(())
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // DIAMONDPROXY__RAPNET__REFRESH_SKEW -> rapnet.refresh_skew
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.shopify.api_version, "2024-01");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
static_dir = "web/dist"
max_payload_bytes = "2MB"

[rapnet]
auth_url = "http://localhost:7001/token"
refresh_skew = "2m"
request_timeout = 10

[shopify]
lookup_limit = 50

[mail]
smtp_host = "smtp.example.com"
smtp_port = 465
smtp_secure = true
owner_email = "owner@example.com"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.static_dir, PathBuf::from("web/dist"));
        assert_eq!(config.server.max_payload_bytes.as_u64(), 2 * 1024 * 1024);
        assert_eq!(config.rapnet.auth_url, "http://localhost:7001/token");
        assert_eq!(config.rapnet.refresh_skew.as_duration(), Duration::from_secs(120));
        assert_eq!(config.rapnet.request_timeout.as_duration(), Duration::from_secs(10));
        assert_eq!(config.shopify.lookup_limit, 50);
        assert_eq!(config.mail.smtp_port, Some(465));
        assert!(config.mail.smtp_secure);
    }

    #[test]
    fn test_apply_secrets() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("CLIENT_ID", "rap-id"),
            ("CLIENT_SECRET", "rap-secret"),
            ("SHOPIFY_STORE", "gems.myshopify.com"),
            ("SHOPIFY_ACCESS_TOKEN", "shpat_123"),
            ("SMTP_PORT", "587"),
            ("SMTP_SECURE", "false"),
            ("PORT", "8081"),
        ]);

        apply_secrets(&mut config, lookup).unwrap();

        assert_eq!(config.rapnet.client_id.as_deref(), Some("rap-id"));
        assert_eq!(config.rapnet.client_secret.as_deref(), Some("rap-secret"));
        assert_eq!(config.shopify.store.as_deref(), Some("gems.myshopify.com"));
        assert_eq!(config.shopify.access_token.as_deref(), Some("shpat_123"));
        assert_eq!(config.mail.smtp_port, Some(587));
        assert!(!config.mail.smtp_secure);
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8081");
    }

    #[test]
    fn test_apply_secrets_ignores_blank_values() {
        let mut config = Config::default();
        apply_secrets(&mut config, lookup_from(&[("CLIENT_ID", "   ")])).unwrap();
        assert!(config.rapnet.client_id.is_none());
    }

    #[test]
    fn test_apply_secrets_rejects_bad_port() {
        let mut config = Config::default();
        let result = apply_secrets(&mut config, lookup_from(&[("PORT", "http")]));
        assert!(result.is_err());
    }
}
