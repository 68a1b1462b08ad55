//! Create-if-absent publishing of diamonds as Shopify products
//!
//! The lookup reads a single bounded page of products and scans its variants
//! for the SKU. A product that only exists on a later page is not found and
//! gets created again; raising `shopify.lookup_limit` (max 250) widens the
//! window.

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use super::client::{ProductSummary, ShopifyClient};
use super::diamond::DiamondRecord;
use super::error::ProductError;
use super::payload::ProductPayload;
use crate::config::ShopifyConfig;
use crate::observability::Metrics;

/// Product/variant pair published for a diamond
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub product_id: u64,
    pub variant_id: u64,
    pub variants: Vec<Value>,
}

impl ProductRef {
    pub fn variant_gid(&self) -> String {
        format!("gid://shopify/ProductVariant/{}", self.variant_id)
    }

    pub fn product_gid(&self) -> String {
        format!("gid://shopify/Product/{}", self.product_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Existing(ProductRef),
    Created(ProductRef),
}

impl UpsertOutcome {
    pub fn product(&self) -> &ProductRef {
        match self {
            UpsertOutcome::Existing(product) | UpsertOutcome::Created(product) => product,
        }
    }
}

#[derive(Debug)]
pub struct ProductUpserter {
    client: Option<ShopifyClient>,
    lookup_limit: usize,
    metrics: Arc<Metrics>,
}

impl ProductUpserter {
    /// An unconfigured store is not an error here; every upsert then fails
    /// with [`ProductError::ConfigMissing`] before touching the network.
    pub fn new(config: &ShopifyConfig, metrics: Arc<Metrics>) -> Result<Self, ProductError> {
        let client = match ShopifyClient::from_config(config) {
            Ok(client) => Some(client),
            Err(ProductError::ConfigMissing) => None,
            Err(other) => return Err(other),
        };

        Ok(Self {
            client,
            lookup_limit: config.lookup_limit,
            metrics,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn upsert(&self, diamond: &DiamondRecord) -> Result<UpsertOutcome, ProductError> {
        let client = self.client.as_ref().ok_or_else(|| {
            warn!("Shopify credentials not configured");
            ProductError::ConfigMissing
        })?;
        let sku = diamond.sku().ok_or(ProductError::MissingSku)?;

        info!(%sku, "Publishing diamond as product");

        // Lookup failures fall through to create
        match client.list_products(self.lookup_limit).await {
            Ok(products) => {
                if let Some(existing) = find_by_sku(&products, &sku) {
                    info!(%sku, product_id = existing.product_id, "Found existing product");
                    self.metrics.product_reused();
                    return Ok(UpsertOutcome::Existing(existing));
                }
            }
            Err(err) => {
                warn!(%sku, error = %err, details = ?err, "Error searching for existing product");
            }
        }

        let payload = ProductPayload::from_diamond(diamond, &sku);
        let created = client.create_product(&payload).await?;

        let variant_id = created
            .variants
            .first()
            .and_then(|variant| variant.get("id"))
            .and_then(Value::as_u64)
            .ok_or_else(|| ProductError::Create {
                status: None,
                details: json!("created product has no variants"),
            })?;

        info!(%sku, product_id = created.id, "Product created successfully");
        self.metrics.product_created();

        Ok(UpsertOutcome::Created(ProductRef {
            product_id: created.id,
            variant_id,
            variants: created.variants,
        }))
    }
}

fn find_by_sku(products: &[ProductSummary], sku: &str) -> Option<ProductRef> {
    products.iter().find_map(|product| {
        product
            .variants
            .iter()
            .find(|variant| variant.sku.as_deref() == Some(sku))
            .map(|variant| ProductRef {
                product_id: product.id,
                variant_id: variant.id,
                variants: vec![json!({ "id": variant.id })],
            })
    })
}
