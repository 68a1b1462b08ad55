use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use thiserror::Error;

use super::models::ErrorResponse;
use crate::inquiry::InquiryError;
use crate::products::ProductError;
use crate::rapnet::RapnetError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("payload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    Validation(String),
    #[error("failed to search diamonds")]
    SearchFailed { status: Option<u16>, details: Value },
    #[error("Shopify not configured")]
    ShopifyNotConfigured,
    #[error("failed to create product")]
    ProductCreateFailed { status: Option<u16>, details: Value },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Upstream failures mirror the upstream status when it is an error
    /// status; everything else unknown is a 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::SearchFailed { status, .. } | ApiError::ProductCreateFailed { status, .. } => {
                status
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .filter(|code| code.is_client_error() || code.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::ShopifyNotConfigured | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::SearchFailed { .. } => "SEARCH_FAILED",
            ApiError::ShopifyNotConfigured => "SHOPIFY_NOT_CONFIGURED",
            ApiError::ProductCreateFailed { .. } => "PRODUCT_CREATE_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Short human summary for the `error` field
    pub fn summary(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "Invalid request payload",
            ApiError::PayloadTooLarge(_) => "Payload too large",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Validation(_) => "Validation failed",
            ApiError::SearchFailed { .. } => "Failed to search diamonds",
            ApiError::ShopifyNotConfigured => "Shopify not configured",
            ApiError::ProductCreateFailed { .. } => "Failed to create product",
            ApiError::Internal(_) => "Internal server error",
        }
    }

    pub fn details(&self) -> Value {
        match self {
            ApiError::SearchFailed { details, .. } | ApiError::ProductCreateFailed { details, .. } => {
                details.clone()
            }
            ApiError::ShopifyNotConfigured => {
                Value::String("Please set SHOPIFY_STORE and SHOPIFY_ACCESS_TOKEN".to_string())
            }
            ApiError::InvalidPayload(message)
            | ApiError::Validation(message)
            | ApiError::Internal(message) => Value::String(message.clone()),
            other => Value::String(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.summary().to_string(),
            details: self.details(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<RapnetError> for ApiError {
    fn from(err: RapnetError) -> Self {
        match err {
            // Token failures never mirror the identity endpoint's status
            RapnetError::TokenFetch { body, .. } => ApiError::SearchFailed {
                status: None,
                details: body,
            },
            RapnetError::Search { status, body } => ApiError::SearchFailed {
                status,
                details: body,
            },
            RapnetError::MissingCredentials => ApiError::SearchFailed {
                status: None,
                details: Value::String(err.to_string()),
            },
            RapnetError::Client(message) => ApiError::Internal(message),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::ConfigMissing => ApiError::ShopifyNotConfigured,
            ProductError::MissingSku | ProductError::InvalidRecord => {
                ApiError::InvalidPayload(err.to_string())
            }
            ProductError::Lookup { status, details } | ProductError::Create { status, details } => {
                ApiError::ProductCreateFailed { status, details }
            }
            ProductError::Client(message) => ApiError::Internal(message),
        }
    }
}

impl From<InquiryError> for ApiError {
    fn from(err: InquiryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
