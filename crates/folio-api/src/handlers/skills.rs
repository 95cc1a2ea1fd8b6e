use axum::{
    extract::{Path, State},
    response::Response,
};

use folio_core::{parse_uuid, NewSkill, SkillPatch};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// GET /api/skills (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let skills = state.store.list_skills().await?;
    Ok(response::data(skills))
}

/// GET /api/skills/{id} (public)
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    let skill = state
        .store
        .get_skill(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;
    Ok(response::data(skill))
}

/// POST /api/skills (admin)
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    ValidatedJson(input): ValidatedJson<NewSkill>,
) -> ApiResult<Response> {
    let skill = state.store.create_skill(input).await?;
    Ok(response::created("Skill created successfully", skill))
}

/// PUT /api/skills/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<SkillPatch>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let skill = state
        .store
        .update_skill(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))?;
    Ok(response::with_message("Skill updated successfully", skill))
}

/// DELETE /api/skills/{id} (admin)
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if !state.store.delete_skill(id).await? {
        return Err(ApiError::NotFound("Skill not found".to_string()));
    }
    Ok(response::message("Skill deleted successfully"))
}
