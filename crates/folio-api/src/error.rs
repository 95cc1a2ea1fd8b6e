use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use folio_core::{CoreError, ValidationError};
use folio_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// No token on a protected route.
    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    /// Uniform login failure, regardless of which credential was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded for {scope}")]
    RateLimited {
        scope: &'static str,
        limit: u32,
        retry_after_secs: u64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Database(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCredentials => ApiError::InvalidCredentials,
            CoreError::TokenExpired => ApiError::TokenExpired,
            CoreError::InvalidToken => ApiError::InvalidToken,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AuthRequired => error_response(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                Some("Authentication required. Please log in."),
            ),
            ApiError::TokenExpired => error_response(
                StatusCode::UNAUTHORIZED,
                "Token expired",
                Some("Your session has expired. Please log in again."),
            ),
            ApiError::InvalidToken => error_response(
                StatusCode::FORBIDDEN,
                "Invalid token",
                Some("Authentication failed. Please log in again."),
            ),
            ApiError::InvalidCredentials => error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
                Some("Username or password is incorrect."),
            ),
            ApiError::Validation(err) => {
                let body = Json(json!({
                    "success": false,
                    "error": "Validation failed",
                    "details": err.details,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::BadRequest(message) => {
                error_response(StatusCode::BAD_REQUEST, &message, None)
            }
            ApiError::PayloadTooLarge => error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large",
                Some("Request body exceeds the 10 KB limit."),
            ),
            ApiError::Unauthorized(message) => {
                error_response(StatusCode::UNAUTHORIZED, &message, None)
            }
            ApiError::NotFound(message) => error_response(StatusCode::NOT_FOUND, &message, None),
            ApiError::RateLimited {
                scope: _,
                limit,
                retry_after_secs,
            } => {
                let body = Json(json!({
                    "success": false,
                    "error": "Too many requests",
                    "message": "You have exceeded the rate limit. Please try again later.",
                    "retryAfter": retry_after_secs,
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                let headers = response.headers_mut();
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    headers.insert("Retry-After", value);
                }
                if let Ok(value) = HeaderValue::from_str(&limit.to_string()) {
                    headers.insert("X-RateLimit-Limit", value);
                }
                headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
                response
            }
            ApiError::Internal(detail) => {
                // Never leak internals to the client; the detail goes to the log.
                tracing::error!(detail = %detail, "Internal server error");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    Some("An unexpected error occurred"),
                )
            }
        }
    }
}

fn error_response(status: StatusCode, error: &str, message: Option<&str>) -> Response {
    let body = match message {
        Some(message) => json!({
            "success": false,
            "error": error,
            "message": message,
        }),
        None => json!({
            "success": false,
            "error": error,
        }),
    };
    (status, Json(body)).into_response()
}

pub type ApiResult<T> = Result<T, ApiError>;
