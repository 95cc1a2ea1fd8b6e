use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use folio_core::{
    hash_password, verify_password, AuthUser, FieldValidator, SecurityEvent, SecurityLogger,
    Validate, ValidationError,
};

use crate::auth::{client_ip, AuthRateLimit, CurrentUser, StrictRateLimit};
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.required_text("username", &mut self.username, 50);
        v.password("password", &self.password, 6, 100);
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.password("currentPassword", &self.current_password, 1, 100);
        v.password("newPassword", &self.new_password, 6, 100);
        v.finish()
    }
}

fn auth_cookie(state: &AppState, token: &str, max_age_secs: i64) -> ApiResult<HeaderValue> {
    let mut cookie = format!("token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if state.settings.environment.is_production() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/auth/login
///
/// The failure response is identical for an unknown username and a wrong
/// password so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    let ip = client_ip(&headers);

    let Some(user) = state.store.find_user_by_username(&input.username).await? else {
        SecurityLogger::log_event(SecurityEvent::AuthenticationFailure {
            username: input.username,
            ip_address: ip,
            reason: "unknown username".to_string(),
        });
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&input.password, &user.password_hash)? {
        SecurityLogger::log_event(SecurityEvent::AuthenticationFailure {
            username: user.username,
            ip_address: ip,
            reason: "wrong password".to_string(),
        });
        return Err(ApiError::InvalidCredentials);
    }

    let identity = AuthUser {
        id: user.id,
        username: user.username.clone(),
    };
    let token = state.jwt.create_token(&identity)?;

    SecurityLogger::log_event(SecurityEvent::AuthenticationSuccess {
        user_id: user.id,
        ip_address: ip,
    });

    let max_age = state.settings.auth.jwt_expiry_hours * 3600;
    let cookie = auth_cookie(&state, &token, max_age)?;

    let mut response = Json(json!({
        "success": true,
        "message": "Login successful",
        "user": { "id": user.id, "username": user.username },
        "token": token,
    }))
    .into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> ApiResult<Response> {
    let cookie = auth_cookie(&state, "", 0)?;
    let mut response = response::message("Logged out successfully");
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Response {
    Json(json!({ "success": true, "user": user })).into_response()
}

/// POST /api/auth/verify
pub async fn verify(CurrentUser(user): CurrentUser) -> Response {
    Json(json!({ "success": true, "valid": true, "user": user })).into_response()
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    _limit: StrictRateLimit,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Response> {
    let Some(user) = state.store.find_user_by_id(identity.id).await? else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    if !verify_password(&input.current_password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&input.new_password)?;
    state.store.update_user_password(user.id, &new_hash).await?;

    SecurityLogger::log_event(SecurityEvent::PasswordChanged { user_id: user.id });
    Ok(response::message("Password changed successfully"))
}
