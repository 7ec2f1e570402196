//! HTTP API handlers.

pub mod error;
pub mod upload;

use axum::Json;
use serde_json::{Value, json};

pub use error::{ApiError, ErrorBody};
pub use upload::{UploadResponse, upload_handler};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
