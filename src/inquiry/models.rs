use serde::{Deserialize, Serialize};

use super::error::InquiryError;
use crate::numeric;
use crate::products::DiamondRecord;

/// Inquiry body as posted by the storefront
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[serde(default)]
    pub customer: CustomerDetails,
    #[serde(default)]
    pub diamond: Option<DiamondRecord>,
    #[serde(default, deserialize_with = "numeric::loose_u32")]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "numeric::loose_f64")]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub total_price_formatted: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Inquiry whose required fields are all present and non-blank
#[derive(Debug, Clone)]
pub struct ValidInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub diamond: DiamondRecord,
    pub quantity: u32,
    pub total_price: Option<String>,
    pub message: Option<String>,
}

impl InquiryRequest {
    pub fn validate(self) -> Result<ValidInquiry, InquiryError> {
        let mut missing = Vec::new();

        let name = required(self.customer.name, "customer.name", &mut missing);
        let email = required(self.customer.email, "customer.email", &mut missing);
        let phone = required(self.customer.phone, "customer.phone", &mut missing);
        let diamond = self.diamond.filter(|d| !d.as_map().is_empty());
        if diamond.is_none() {
            missing.push("diamond");
        }

        match (name, email, phone, diamond) {
            (Some(name), Some(email), Some(phone), Some(diamond)) => {
                let total_price = self
                    .total_price_formatted
                    .and_then(|p| trimmed(Some(p)))
                    .or_else(|| self.total_price.map(|p| format!("{p:.2}")));

                Ok(ValidInquiry {
                    name,
                    email,
                    phone,
                    diamond,
                    quantity: self.quantity.unwrap_or(1).max(1),
                    total_price,
                    message: trimmed(self.message),
                })
            }
            _ => Err(InquiryError::Validation { missing }),
        }
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = trimmed(value);
    if value.is_none() {
        missing.push(field);
    }
    value
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
