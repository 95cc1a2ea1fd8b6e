use axum::http::{header, request::Parts, HeaderMap};

use folio_core::{AuthUser, CoreError, SecurityEvent, SecurityLogger};

use crate::error::ApiError;
use crate::state::AppState;

/// Best-effort client address for logging and rate-limit keys. The server
/// sits behind a reverse proxy, so forwarded headers are the real source.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.to_string();
    }
    "unknown".to_string()
}

/// Pull the token from the `token` cookie first, then from a Bearer header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            if let Some(value) = pair.trim().strip_prefix("token=") {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    let ip = client_ip(&parts.headers);
    let Some(token) = extract_token(&parts.headers) else {
        return Err(ApiError::AuthRequired);
    };

    match state.jwt.validate_token(&token) {
        Ok(user) => Ok(user),
        Err(err) => {
            SecurityLogger::log_event(SecurityEvent::AuthenticationFailure {
                username: "unknown".to_string(),
                ip_address: ip,
                reason: err.to_string(),
            });
            Err(match err {
                CoreError::TokenExpired => ApiError::TokenExpired,
                _ => ApiError::InvalidToken,
            })
        }
    }
}

/// A valid authenticated identity. Rejects with 401 when the token is
/// missing or expired and 403 when it fails verification.
pub struct CurrentUser(pub AuthUser);

impl axum::extract::FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(CurrentUser)
    }
}

/// Authenticated identity plus the per-user admin rate limit.
pub struct AdminUser(pub AuthUser);

impl axum::extract::FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state)?;
        let ip = client_ip(&parts.headers);
        state.rate_limits.check_admin(user.id, &ip)?;
        Ok(AdminUser(user))
    }
}

/// Brute-force guard for the login endpoint, keyed by client IP.
pub struct AuthRateLimit;

impl axum::extract::FromRequestParts<AppState> for AuthRateLimit {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip = client_ip(&parts.headers);
        state.rate_limits.check_auth(&ip)?;
        Ok(AuthRateLimit)
    }
}

/// Tight limit for sensitive operations such as password changes.
pub struct StrictRateLimit;

impl axum::extract::FromRequestParts<AppState> for StrictRateLimit {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip = client_ip(&parts.headers);
        state.rate_limits.check_strict(&ip)?;
        Ok(StrictRateLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn client_ip_falls_back_to_real_ip_then_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn token_cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=cookie-token"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn bearer_header_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("header-token"));
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
