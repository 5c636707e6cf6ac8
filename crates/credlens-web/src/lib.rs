//! Axum HTTP service: accepts a financial PDF upload, delegates extraction
//! and report generation to the vendor services, and returns a combined
//! JSON response.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

pub mod archive;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod upload;

use state::AppState;

/// Maximum accepted request body size (50MB).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router over a process-scoped state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route(
            "/process-pdf",
            axum::routing::post(handlers::process::process_pdf),
        )
        .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
