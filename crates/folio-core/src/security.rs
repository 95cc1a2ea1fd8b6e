use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{CoreError, Result};

/// The authenticated identity carried through request extensions.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Stateless JWT token manager (HS256).
pub struct JwtManager {
    secret: SecretString,
    expiry_hours: i64,
}

impl JwtManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiry_hours: config.jwt_expiry_hours,
        }
    }

    pub fn create_token(&self, user: &AuthUser) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| CoreError::TokenGeneration(e.to_string()))
    }

    /// Validate a token and recover the user it was issued to. Expired
    /// tokens are distinguished from otherwise invalid ones so the API can
    /// tell the client to log in again rather than reject outright.
    pub fn validate_token(&self, token: &str) -> Result<AuthUser> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => CoreError::TokenExpired,
            _ => CoreError::InvalidToken,
        })?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| CoreError::InvalidToken)?;
        Ok(AuthUser {
            id,
            username: data.claims.username,
        })
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CoreError::CryptographicFailure(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CoreError::CryptographicFailure(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Security event logging
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    AuthenticationFailure {
        username: String,
        ip_address: String,
        reason: String,
    },
    AuthenticationSuccess {
        user_id: Uuid,
        ip_address: String,
    },
    PasswordChanged {
        user_id: Uuid,
    },
    RateLimitExceeded {
        scope: &'static str,
        key: String,
        ip_address: String,
    },
}

pub struct SecurityLogger;

impl SecurityLogger {
    pub fn log_event(event: SecurityEvent) {
        use tracing::{info, warn};

        match event {
            SecurityEvent::AuthenticationFailure {
                username,
                ip_address,
                reason,
            } => {
                warn!(
                    username = %username,
                    ip_address = %ip_address,
                    reason = %reason,
                    "Authentication failure"
                );
            }
            SecurityEvent::AuthenticationSuccess { user_id, ip_address } => {
                info!(
                    user_id = %user_id,
                    ip_address = %ip_address,
                    "Authentication success"
                );
            }
            SecurityEvent::PasswordChanged { user_id } => {
                info!(user_id = %user_id, "Password changed");
            }
            SecurityEvent::RateLimitExceeded {
                scope,
                key,
                ip_address,
            } => {
                warn!(
                    scope = %scope,
                    key = %key,
                    ip_address = %ip_address,
                    "Rate limit exceeded"
                );
            }
        }
    }
}
