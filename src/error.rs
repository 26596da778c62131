use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotoSwapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("API error: {message}")]
    Api { message: String },

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("No users available from the data provider")]
    NoUsers,

    #[error("User not found: {0}")]
    UserNotFound(i64),
}

pub type Result<T> = std::result::Result<T, MotoSwapError>;
