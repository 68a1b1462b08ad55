use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Shopify not configured")]
    ConfigMissing,

    #[error("diamond record has neither stock_num nor diamond_id")]
    MissingSku,

    #[error("diamond record must be a JSON object")]
    InvalidRecord,

    #[error("product lookup failed")]
    Lookup { status: Option<u16>, details: Value },

    #[error("failed to create product")]
    Create { status: Option<u16>, details: Value },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ProductError {
    pub(crate) fn lookup_transport(err: reqwest::Error) -> Self {
        ProductError::Lookup {
            status: None,
            details: Value::String(err.to_string()),
        }
    }

    pub(crate) fn create_transport(err: reqwest::Error) -> Self {
        ProductError::Create {
            status: None,
            details: Value::String(err.to_string()),
        }
    }
}
