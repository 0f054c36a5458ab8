//! Error types for Shopfront

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Config file not found. Run 'shopfront init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
