//! Error types for Moltcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MoltcastError>;

#[derive(Error, Debug)]
pub enum MoltcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Account store error: {0}")]
    Store(#[from] StoreError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MoltcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MoltcastError::InvalidInput(_) => 3,
            MoltcastError::Api(ApiError::Authentication(_)) => 2,
            MoltcastError::Api(_) => 1,
            MoltcastError::Config(_) => 1,
            MoltcastError::Store(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read account file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse account file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to write account file: {0}")]
    WriteError(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),
}

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Post failed: {0}")]
    Posting(String),

    #[error("Index post failed: {0}")]
    Indexing(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Network error: {0}")]
    Network(String),
}
