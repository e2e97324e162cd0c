//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub bundle: String,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check that the page bundle is in place
    let bundle_status = match tokio::fs::metadata(state.config.site.index_path()).await {
        Ok(meta) if meta.is_file() => "present".to_string(),
        _ => "missing".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        bundle: bundle_status,
    })
}
