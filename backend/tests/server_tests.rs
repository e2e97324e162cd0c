//! Integration tests for the calculator site server
//!
//! Tests cover:
//! - Every calculator route answers with the bundle's entry page
//! - Bundle assets are served from the static directory
//! - Unknown paths and a missing bundle give JSON errors
//! - Health and tool index endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use shared::routes::Route;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use winery_calculators_server::{create_app, AppState, Config};

const INDEX_HTML: &str = "<!doctype html><title>Kalkylator</title><div id=\"app\"></div>";

/// Test helper: Bundle directory with an entry page and one asset
fn setup_bundle() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('kalkylator');").unwrap();
    dir
}

fn setup_app(dir: &TempDir) -> Router {
    create_app(AppState::new(Config::for_static_dir(dir.path())))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Page Routes
// =============================================================================

#[tokio::test]
async fn test_every_route_serves_entry_page() {
    let dir = setup_bundle();

    for route in Route::ALL {
        let response = setup_app(&dir)
            .oneshot(test_request("GET", route.path()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{}", route.path());
        assert_eq!(extract_text(response.into_body()).await, INDEX_HTML);
    }
}

#[tokio::test]
async fn test_trailing_slash_serves_entry_page() {
    let dir = setup_bundle();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/jaststart/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_missing_bundle_is_service_unavailable() {
    let dir = TempDir::new().unwrap();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/blend"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BUNDLE_UNAVAILABLE");
    assert!(body["error"]["message_sv"].is_string());
}

#[tokio::test]
async fn test_unreadable_entry_page_is_io_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("index.html")).unwrap();

    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/basvin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "IO_ERROR");
}

// =============================================================================
// Static Assets and Fallback
// =============================================================================

#[tokio::test]
async fn test_asset_is_served() {
    let dir = setup_bundle();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/app.js"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        extract_text(response.into_body()).await,
        "console.log('kalkylator');"
    );
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let dir = setup_bundle();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/inrapportering/okand"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["path"], "/inrapportering/okand");
}

// =============================================================================
// API Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_reports_bundle() {
    let dir = setup_bundle();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["bundle"], "present");
    assert!(body["version"].is_string());

    let empty = TempDir::new().unwrap();
    let response = setup_app(&empty)
        .oneshot(test_request("GET", "/api/v1/health"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["bundle"], "missing");
}

#[tokio::test]
async fn test_tool_index() {
    let dir = setup_bundle();
    let response = setup_app(&dir)
        .oneshot(test_request("GET", "/api/v1/tools"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["title"], "Andrajäsning");
    assert_eq!(categories[1]["tools"][0]["path"], "/instruktioner/leverans");
}
