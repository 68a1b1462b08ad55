use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{
    services::{create_product, health, method_not_allowed, search_diamonds, send_inquiry},
    state::AppState,
};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// API routes plus the storefront's static files
///
/// Unknown paths fall back to `index.html` so client-side routes resolve.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let storefront =
        ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(health).fallback(method_not_allowed))
        .route(
            "/api/diamonds/search",
            post(search_diamonds).fallback(method_not_allowed),
        )
        .route(
            "/api/diamonds/send-inquiry",
            post(send_inquiry).fallback(method_not_allowed),
        )
        .route(
            "/apps/diamond/createProduct",
            post(create_product).fallback(method_not_allowed),
        )
        .fallback_service(storefront)
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
    let address = address.unwrap_or(config.server.bind_addr);

    let state = AppState::from_config(config)?;
    info!(
        rapnet_credentials = state.config.has_rapnet_credentials(),
        shopify = state.products.is_configured(),
        inquiry_email = state.inquiries.can_notify(),
        static_dir = %state.config.server.static_dir.display(),
        "Environment check"
    );

    let app = build_router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "diamondproxy listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
