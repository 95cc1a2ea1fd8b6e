use axum::{
    extract::{Path, State},
    response::Response,
};

use folio_core::{parse_uuid, ExperiencePatch, NewExperience};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// GET /api/experiences (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let experiences = state.store.list_experiences().await?;
    Ok(response::data(experiences))
}

/// GET /api/experiences/{id} (public)
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    let experience = state
        .store
        .get_experience(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Experience not found".to_string()))?;
    Ok(response::data(experience))
}

/// POST /api/experiences (admin)
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    ValidatedJson(input): ValidatedJson<NewExperience>,
) -> ApiResult<Response> {
    let experience = state.store.create_experience(input).await?;
    Ok(response::created("Experience created successfully", experience))
}

/// PUT /api/experiences/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<ExperiencePatch>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let experience = state
        .store
        .update_experience(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Experience not found".to_string()))?;
    Ok(response::with_message(
        "Experience updated successfully",
        experience,
    ))
}

/// DELETE /api/experiences/{id} (admin)
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if !state.store.delete_experience(id).await? {
        return Err(ApiError::NotFound("Experience not found".to_string()));
    }
    Ok(response::message("Experience deleted successfully"))
}
