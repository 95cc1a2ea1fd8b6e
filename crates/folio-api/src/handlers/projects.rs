use axum::{
    extract::{Path, State},
    response::Response,
};

use folio_core::{parse_uuid, NewProject, ProjectPatch};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// GET /api/projects (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let projects = state.store.list_projects().await?;
    Ok(response::data(projects))
}

/// GET /api/projects/{id} (public)
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    let project = state
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(response::data(project))
}

/// POST /api/projects (admin)
pub async fn create(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    ValidatedJson(input): ValidatedJson<NewProject>,
) -> ApiResult<Response> {
    let project = state.store.create_project(input).await?;
    Ok(response::created("Project created successfully", project))
}

/// PUT /api/projects/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<ProjectPatch>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let project = state
        .store
        .update_project(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(response::with_message("Project updated successfully", project))
}

/// DELETE /api/projects/{id} (admin)
pub async fn remove(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_uuid("id", &id)?;
    if !state.store.delete_project(id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    Ok(response::message("Project deleted successfully"))
}
