use super::models::Config;
use thiserror::Error;

/// Shopify rejects product list pages larger than this
const SHOPIFY_MAX_PAGE: usize = 250;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.bind_addr must use a non-zero port")]
    ZeroPort,

    #[error("server.max_payload_bytes must be positive")]
    ZeroPayloadLimit,

    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("rapnet.refresh_skew must be positive")]
    ZeroRefreshSkew,

    #[error("{field} must be positive")]
    ZeroTimeout { field: &'static str },

    #[error("shopify.lookup_limit must be between 1 and {max}, got {actual}")]
    InvalidLookupLimit { actual: usize, max: usize },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_rapnet(config)?;
    validate_shopify(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.bind_addr.port() == 0 {
        return Err(ValidationError::ZeroPort);
    }

    if config.server.max_payload_bytes.as_u64() == 0 {
        return Err(ValidationError::ZeroPayloadLimit);
    }

    Ok(())
}

fn validate_rapnet(config: &Config) -> Result<(), ValidationError> {
    validate_url("rapnet.auth_url", &config.rapnet.auth_url)?;
    validate_url("rapnet.search_url", &config.rapnet.search_url)?;

    if config.rapnet.refresh_skew.is_zero() {
        return Err(ValidationError::ZeroRefreshSkew);
    }

    if config.rapnet.request_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "rapnet.request_timeout",
        });
    }

    Ok(())
}

fn validate_shopify(config: &Config) -> Result<(), ValidationError> {
    if let Some(base) = &config.shopify.api_base {
        validate_url("shopify.api_base", base)?;
    }

    if !(1..=SHOPIFY_MAX_PAGE).contains(&config.shopify.lookup_limit) {
        return Err(ValidationError::InvalidLookupLimit {
            actual: config.shopify.lookup_limit,
            max: SHOPIFY_MAX_PAGE,
        });
    }

    if config.shopify.request_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout {
            field: "shopify.request_timeout",
        });
    }

    Ok(())
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::HumanDuration;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut config = Config::default();
        config.server.bind_addr.set_port(0);
        assert!(matches!(validate(&config), Err(ValidationError::ZeroPort)));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = Config::default();
        config.rapnet.search_url = "ftp://inventory".to_string();

        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidUrl { field: "rapnet.search_url", .. }
        ));
    }

    #[test]
    fn test_rejects_zero_skew() {
        let mut config = Config::default();
        config.rapnet.refresh_skew = HumanDuration::from_secs(0);
        assert!(matches!(validate(&config), Err(ValidationError::ZeroRefreshSkew)));
    }

    #[test]
    fn test_rejects_oversized_lookup_page() {
        let mut config = Config::default();
        config.shopify.lookup_limit = 251;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidLookupLimit { actual: 251, max: 250 })
        ));

        config.shopify.lookup_limit = 0;
        assert!(validate(&config).is_err());
    }
}
