use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{
    models::{HealthResponse, InquiryResponse, ProductResponse},
    state::AppState,
};
use crate::api::error::ApiError;
use crate::inquiry::InquiryRequest;
use crate::products::{DiamondRecord, ProductError};

/// Inventory search proxy (POST /api/diamonds/search)
///
/// Filters are forwarded untouched inside the upstream envelope and the
/// upstream JSON comes back verbatim with its status. An empty body is sent
/// as `{}`.
pub async fn search_diamonds(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let params = read_json(&state, &headers, body).await?;
    info!(filters = %params, "Received search request");

    let result = async {
        let token = state.tokens.get_token().await?;
        state.rapnet.search(&token, &params).await
    }
    .await;

    match result {
        Ok(response) => {
            state.metrics.search_proxied();
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
            Ok((status, Json(response.body)))
        }
        Err(err) => {
            state.metrics.search_failed();
            warn!(error = %err, status = ?err.upstream_status(), details = %err.details(), "Error searching diamonds");
            Err(err.into())
        }
    }
}

/// Liveness plus whether a live token is cached (GET /api/health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        token_valid: state.tokens.is_valid().await,
    })
}

/// Publish a diamond as a Shopify product (POST /apps/diamond/createProduct)
pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    // Configuration is checked before the record is inspected
    if !state.products.is_configured() {
        warn!("Shopify credentials not configured");
        return Err(ProductError::ConfigMissing.into());
    }

    let value = read_json(&state, &headers, body).await?;
    let diamond = DiamondRecord::from_value(value).ok_or(ProductError::InvalidRecord)?;

    let outcome = state.products.upsert(&diamond).await.inspect_err(|err| {
        warn!(error = %err, details = ?err, "Error creating Shopify product");
    })?;

    Ok(Json(ProductResponse::from(outcome)))
}

/// Customer inquiry about a diamond (POST /api/diamonds/send-inquiry)
pub async fn send_inquiry(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let value = read_json(&state, &headers, body).await?;
    let request: InquiryRequest = serde_json::from_value(value)?;

    let receipt = state.inquiries.submit(request).await?;

    Ok(Json(InquiryResponse::from(receipt)))
}

/// Shared 405 for every API route
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Reads a JSON request body within the configured size limit
///
/// An empty body reads as `{}`. A non-empty body must be declared as JSON.
/// Decompression is handled by `RequestDecompressionLayer` upstream of this.
async fn read_json(
    state: &AppState,
    headers: &HeaderMap,
    body: axum::body::Body,
) -> Result<Value, ApiError> {
    let limit = state.config.server.max_payload_bytes.as_usize();
    let data = super::utils::read_body(body, limit).await?;

    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    super::utils::parse_content_type(content_type)?;

    Ok(serde_json::from_slice(&data)?)
}
