pub mod config;
pub mod error;
pub mod security;
pub mod types;
pub mod validation;

pub use config::{
    AuthConfig, CorsConfig, DatabaseBackend, DatabaseConfig, Environment, ServerConfig, Settings,
};
pub use error::*;
pub use security::*;
pub use types::*;
pub use validation::*;
