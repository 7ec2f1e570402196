use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api;
use crate::config::AppConfig;
use crate::google::ServiceAccountAuthenticator;

/// Build the application router around `state`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/upload", post(api::upload_handler))
        .route("/health", get(api::health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "google.config.loaded",
        credentials_file = %config.google.credentials_file.display(),
        drive_api_base = %config.google.drive_api_base,
        docs_api_base = %config.google.docs_api_base,
        "Google configuration loaded"
    );

    if !config.google.credentials_file.exists() {
        tracing::warn!(
            name: "google.credentials.missing",
            credentials_file = %config.google.credentials_file.display(),
            "Credentials file not found; uploads will fail until it exists"
        );
    }

    let authenticator = Arc::new(ServiceAccountAuthenticator::new(config.google.clone())?);

    let state = AppState {
        config: Arc::clone(&config),
        authenticator,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
