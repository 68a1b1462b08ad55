//! Configuration management for diamondproxy
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use diamondproxy::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Settings can be overridden with `DIAMONDPROXY__<section>__<key>`, e.g.
//! `DIAMONDPROXY__RAPNET__REFRESH_SKEW=2m` or
//! `DIAMONDPROXY__SHOPIFY__LOOKUP_LIMIT=100`.
//!
//! Deployment secrets use their conventional flat names and are only read
//! from the environment: `CLIENT_ID`, `CLIENT_SECRET`, `SHOPIFY_STORE`,
//! `SHOPIFY_ACCESS_TOKEN`, `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`,
//! `SMTP_USER`, `SMTP_PASS`, `SMTP_FROM`, `OWNER_EMAIL` and `PORT`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/diamondproxy.toml`.
//! This can be overridden using the `DIAMONDPROXY_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::{ByteSize, HumanDuration};
pub use models::{Config, MailConfig, RapnetConfig, ServerConfig, ShopifyConfig, SmtpSettings};
pub use sources::apply_secrets;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed, a secret has
    /// an unparseable value, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, ignoring secrets
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Whether both RapNet client credentials are present
    pub fn has_rapnet_credentials(&self) -> bool {
        self.rapnet.client_id.is_some() && self.rapnet.client_secret.is_some()
    }
}
