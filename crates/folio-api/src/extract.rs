use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use folio_core::{Validate, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body that has been deserialized strictly and run through its
/// sanitizing validation. Handlers receive clean input or never run.
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest<AppState> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge
                } else {
                    ApiError::Validation(ValidationError::single("body", rejection.body_text()))
                }
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
