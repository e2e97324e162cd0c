//! Winery calculators - site server
//!
//! Serves the built calculator pages for every route path, the tool index and
//! a health check. All calculation happens in the browser.

use axum::{handler::HandlerWithoutStateExt, routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.site.static_dir)
        .not_found_service(handlers::pages::not_found.into_service());

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes())
        .merge(routes::page_routes())
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
