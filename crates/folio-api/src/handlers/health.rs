use axum::{response::IntoResponse, response::Response, Json};
use chrono::Utc;
use serde_json::json;

pub async fn health() -> Response {
    Json(json!({
        "success": true,
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}
