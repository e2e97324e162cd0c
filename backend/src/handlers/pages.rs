//! Calculator page handlers
//!
//! Every calculator route answers with the bundle's entry page so the
//! browser router can take over (history-mode routing).

use axum::{extract::State, http::Uri, response::Html};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Serve the entry page of the built bundle
pub async fn index(State(state): State<AppState>, uri: Uri) -> AppResult<Html<String>> {
    let path = state.config.site.index_path();
    tracing::debug!("Serving {} for {}", path.display(), uri.path());

    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::BundleUnavailable(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fallback for paths that are neither pages nor bundle assets
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
