use thiserror::Error;

/// Vision-provider errors
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },
}

/// Result type for vision-provider operations
pub type AiResult<T> = Result<T, AiError>;
