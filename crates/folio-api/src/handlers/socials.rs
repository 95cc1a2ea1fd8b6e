use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use folio_core::{FieldValidator, SocialUpsert};

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

/// GET /api/socials (public)
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    let socials = state.store.list_socials().await?;
    Ok(response::data(socials))
}

/// PUT /api/socials/{platform} (admin)
///
/// Upsert keyed by platform name: 201 when the link did not exist yet,
/// 200 when it was updated in place.
pub async fn upsert(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
    Path(mut platform): Path<String>,
    ValidatedJson(input): ValidatedJson<SocialUpsert>,
) -> ApiResult<Response> {
    // The path parameter is the upsert key; it gets the same sanitize and
    // length rules as the body fields. A `platform` in the body is ignored
    // in favor of it.
    let mut v = FieldValidator::new();
    v.required_text("platform", &mut platform, 50);
    v.finish()?;

    let (social, created) = state.store.upsert_social(&platform, input).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(response::data_with_status(status, social))
}
