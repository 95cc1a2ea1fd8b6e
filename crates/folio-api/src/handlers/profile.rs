use axum::{extract::State, http::StatusCode, response::Response};

use folio_core::ProfilePatch;

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// GET /api/profile (public). `data` is null until the profile is created.
pub async fn get(State(state): State<AppState>) -> ApiResult<Response> {
    let profile = state.store.get_profile().await?;
    Ok(response::data(profile))
}

/// PUT /api/profile (admin)
///
/// The profile is a singleton: the first PUT creates it (201), later PUTs
/// patch it in place (200).
pub async fn put(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    ValidatedJson(patch): ValidatedJson<ProfilePatch>,
) -> ApiResult<Response> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let (profile, created) = state.store.upsert_profile(patch).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(response::data_with_status(status, profile))
}
