//! API and page route definitions

use axum::{routing::get, Router};
use shared::routes::Route;

use crate::{handlers, AppState};

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/tools", get(handlers::tools::list_tools))
}

/// One route per calculator page, with and without a trailing slash
pub fn page_routes() -> Router<AppState> {
    let mut router = Router::new();
    for route in Route::ALL {
        let path = route.path();
        router = router.route(path, get(handlers::pages::index));
        if path != "/" {
            router = router.route(&format!("{}/", path), get(handlers::pages::index));
        }
    }
    router
}
