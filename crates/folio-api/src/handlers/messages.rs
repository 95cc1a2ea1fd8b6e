use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use folio_core::{parse_uuid, NewMessage};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// POST /api/messages (public) - contact form submission.
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewMessage>,
) -> ApiResult<Response> {
    let message = state.store.create_message(input).await?;
    Ok(response::created("Message sent successfully", message))
}

/// GET /api/messages (admin) - inbox with unread counter.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> ApiResult<Response> {
    let messages = state.store.list_messages().await?;
    let unread = state.store.unread_count().await?;
    Ok(Json(json!({
        "success": true,
        "data": messages,
        "unreadCount": unread,
    }))
    .into_response())
}

/// PUT /api/messages/{id}/read (admin)
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    let message = state
        .store
        .mark_message_read(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;
    Ok(response::data(message))
}

/// DELETE /api/messages/{id} (admin)
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if !state.store.delete_message(id).await? {
        return Err(ApiError::NotFound("Message not found".to_string()));
    }
    Ok(response::message("Message deleted"))
}
