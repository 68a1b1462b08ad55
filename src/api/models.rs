use serde::Serialize;
use serde_json::Value;

use crate::inquiry::InquiryReceipt;
use crate::products::UpsertOutcome;

/// Error body for every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Value,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub token_valid: bool,
}

/// Storefront reference to a published diamond
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Variant GID, what the storefront adds to the cart
    pub id: String,
    pub product_id: String,
    pub variants: Vec<Value>,
}

impl From<UpsertOutcome> for ProductResponse {
    fn from(outcome: UpsertOutcome) -> Self {
        let (UpsertOutcome::Existing(product) | UpsertOutcome::Created(product)) = outcome;
        Self {
            id: product.variant_gid(),
            product_id: product.product_gid(),
            variants: product.variants,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub success: bool,
    pub message: &'static str,
    pub email_sent: bool,
    pub inquiry_id: String,
}

impl From<InquiryReceipt> for InquiryResponse {
    fn from(receipt: InquiryReceipt) -> Self {
        Self {
            success: true,
            message: receipt.message(),
            email_sent: receipt.email_sent(),
            inquiry_id: receipt.id.to_string(),
        }
    }
}
