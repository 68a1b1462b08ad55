//! Minimal Shopify Admin REST client (product list and create)

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::ProductError;
use super::payload::ProductPayload;
use crate::config::ShopifyConfig;
use crate::rapnet::parse_body;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSummary {
    pub id: u64,
    #[serde(default)]
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantSummary {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductList {
    #[serde(default)]
    products: Vec<ProductSummary>,
}

/// Product as returned by the create call; variants are relayed verbatim
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    pub id: u64,
    #[serde(default)]
    pub variants: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    product: CreatedProduct,
}

#[derive(Clone)]
pub struct ShopifyClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ShopifyClient {
    /// Build a client; fails with [`ProductError::ConfigMissing`] when the
    /// store or access token is unset
    pub fn from_config(config: &ShopifyConfig) -> Result<Self, ProductError> {
        let access_token = config
            .access_token
            .clone()
            .ok_or(ProductError::ConfigMissing)?;
        let base_url = config.admin_base_url().ok_or(ProductError::ConfigMissing)?;

        let http = Client::builder()
            .timeout(config.request_timeout.as_duration())
            .build()
            .map_err(|e| ProductError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            access_token,
        })
    }

    /// First page of products with only `id` and `variants` populated
    pub async fn list_products(&self, limit: usize) -> Result<Vec<ProductSummary>, ProductError> {
        let url = format!("{}/products.json", self.base_url);
        let limit = limit.to_string();

        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .query(&[("fields", "id,variants"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(ProductError::lookup_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ProductError::lookup_transport)?;

        if !status.is_success() {
            return Err(ProductError::Lookup {
                status: Some(status.as_u16()),
                details: parse_body(&text),
            });
        }

        let list: ProductList = serde_json::from_str(&text).map_err(|e| ProductError::Lookup {
            status: Some(status.as_u16()),
            details: Value::String(format!("malformed product list: {e}")),
        })?;

        debug!(count = list.products.len(), "Fetched product page");
        Ok(list.products)
    }

    pub async fn create_product(
        &self,
        payload: &ProductPayload,
    ) -> Result<CreatedProduct, ProductError> {
        let url = format!("{}/products.json", self.base_url);

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(payload)
            .send()
            .await
            .map_err(ProductError::create_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(ProductError::create_transport)?;

        if !status.is_success() {
            let body = parse_body(&text);
            let details = body.get("errors").cloned().unwrap_or(body);
            return Err(ProductError::Create {
                status: Some(status.as_u16()),
                details,
            });
        }

        let created: CreatedEnvelope =
            serde_json::from_str(&text).map_err(|e| ProductError::Create {
                status: None,
                details: Value::String(format!("malformed create response: {e}")),
            })?;

        Ok(created.product)
    }
}
