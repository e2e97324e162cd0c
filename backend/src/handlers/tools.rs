//! Tool index for the home page

use axum::Json;
use shared::routes::{tool_index, ToolCategory};

/// Categories and tool cards, in home page order
pub async fn list_tools() -> Json<Vec<ToolCategory>> {
    Json(tool_index())
}
