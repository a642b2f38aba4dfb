//! Error types for the homework bot

/// Errors that can occur in the homework bot
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Connection to {endpoint} failed (from_date={from_date}): {cause}")]
    Connection {
        endpoint: String,
        from_date: i64,
        cause: String,
    },

    #[error("API {endpoint} returned status {status} (from_date={from_date}): {detail}")]
    Api {
        endpoint: String,
        from_date: i64,
        status: u16,
        detail: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected data type in API response: {0}")]
    UnexpectedType(String),

    #[error("Missing key '{0}' in API response")]
    MissingKey(String),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Message delivery failed: {0}")]
    Delivery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
