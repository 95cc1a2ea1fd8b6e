use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Cryptographic operation failed: {0}")]
    CryptographicFailure(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
