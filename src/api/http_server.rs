// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::generate::generate_handler;
use crate::config::AppConfig;
use crate::openrouter::OpenRouterClient;

/// Shared, read-only state. Concurrent requests share nothing mutable
/// beyond the output directory, which tolerates writes to distinct
/// filenames without coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Arc<OpenRouterClient>,
}

/// Build the full application router. Split out of [`start_server`] so
/// tests can drive it without binding a socket.
pub fn router(state: AppState) -> Router {
    let generated_images = ServeDir::new(&state.config.output_dir);
    let prompt_files = ServeDir::new(&state.config.prompts_dir);
    let web_assets = ServeDir::new(&state.config.web_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/generate", post(generate_handler))
        .nest_service("/generated-images", generated_images)
        .nest_service("/image-prompts", prompt_files)
        // Remaining paths fall through to the static UI assets
        .fallback_service(web_assets)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET / - the static UI entry file, or a plain 404 if the UI isn't built.
async fn index_handler(State(state): State<AppState>) -> Response {
    let index_path = state.config.web_dir.join("index.html");
    match tokio::fs::read(&index_path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            "UI not built. Missing web/index.html",
        )
            .into_response(),
    }
}
