use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to parse event payload: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with the event bus: {0}")]
    BusError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for ComposeError {
    fn from(error: reqwest::Error) -> Self {
        ComposeError::HttpError(error.to_string())
    }
}

impl From<redis::RedisError> for ComposeError {
    fn from(error: redis::RedisError) -> Self {
        ComposeError::BusError(error.to_string())
    }
}

impl From<serde_json::Error> for ComposeError {
    fn from(error: serde_json::Error) -> Self {
        ComposeError::ParseError(error.to_string())
    }
}
