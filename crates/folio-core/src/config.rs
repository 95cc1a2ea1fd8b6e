use std::env;

use secrecy::SecretString;
use tracing::info;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

impl Default for DatabaseBackend {
    fn default() -> Self {
        Self::Postgres
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: None,
            max_connections: 20,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 30,
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub jwt_expiry_hours: i64,
    pub admin_username: Option<String>,
    pub admin_password: Option<SecretString>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

const DEFAULT_ORIGINS: &[&str] = &[
    "https://gauravsharma.tech",
    "https://www.gauravsharma.tech",
    "http://localhost:5173",
    "http://localhost:3000",
];

#[derive(Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Assemble settings from the environment. Fails fast on a missing or
    /// weak JWT secret, or a postgres backend without a connection string.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_env();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| ServerConfig::default().host),
            port: parse_var("PORT", ServerConfig::default().port)?,
        };

        let backend = match env::var("DATABASE_BACKEND").as_deref() {
            Ok("memory") => DatabaseBackend::Memory,
            _ => DatabaseBackend::Postgres,
        };
        let url = env::var("DATABASE_URL").ok();
        if backend == DatabaseBackend::Postgres && url.is_none() {
            return Err(CoreError::Config(
                "DATABASE_URL is required for the postgres backend".into(),
            ));
        }
        let database = DatabaseConfig {
            backend,
            url,
            ..DatabaseConfig::default()
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| CoreError::Config("JWT_SECRET environment variable not found".into()))?;
        if jwt_secret.len() < 32 {
            return Err(CoreError::Config(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }
        let auth = AuthConfig {
            jwt_secret: SecretString::from(jwt_secret),
            jwt_expiry_hours: parse_var("JWT_EXPIRY_HOURS", 168)?,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok().map(SecretString::from),
        };

        let mut cors = CorsConfig::default();
        if let Ok(extra) = env::var("ALLOWED_ORIGINS") {
            for origin in extra.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                if !cors.allowed_origins.iter().any(|o| o == origin) {
                    cors.allowed_origins.push(origin.to_string());
                }
            }
        }

        info!(
            environment = ?environment,
            host = %server.host,
            port = server.port,
            backend = ?database.backend,
            "Configuration loaded"
        );

        Ok(Self {
            environment,
            server,
            database,
            auth,
            cors,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| CoreError::Config(format!("Invalid value for {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origins_include_local_dev() {
        let cors = CorsConfig::default();
        assert!(cors
            .allowed_origins
            .iter()
            .any(|o| o == "http://localhost:5173"));
    }

    #[test]
    fn database_defaults_match_pool_policy() {
        let db = DatabaseConfig::default();
        assert_eq!(db.max_connections, 20);
        assert_eq!(db.acquire_timeout_secs, 5);
        assert_eq!(db.idle_timeout_secs, 30);
    }
}
