//! Response envelope helpers. Every JSON body carries a `success` flag so
//! clients can branch without inspecting status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

pub fn data<T: Serialize>(value: T) -> Response {
    Json(json!({ "success": true, "data": value })).into_response()
}

pub fn data_with_status<T: Serialize>(status: StatusCode, value: T) -> Response {
    (status, Json(json!({ "success": true, "data": value }))).into_response()
}

pub fn created<T: Serialize>(message: &str, value: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": message, "data": value })),
    )
        .into_response()
}

pub fn with_message<T: Serialize>(message: &str, value: T) -> Response {
    Json(json!({ "success": true, "message": message, "data": value })).into_response()
}

pub fn message(text: &str) -> Response {
    Json(json!({ "success": true, "message": text })).into_response()
}
