use thiserror::Error;

/// Centralized error types for the relay.
///
/// Everything that can go wrong while handling a webhook or bot update is
/// converted into this enum. Uses `thiserror` for conversions and display
/// formatting.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable is absent or empty
    #[error("required environment variable {0} is not set")]
    ConfigMissing(&'static str),

    /// An exactly-one lookup matched no row
    #[error("server with name \"{0}\" not found")]
    ServerNotFound(String),

    /// An exactly-one lookup matched more than one row
    #[error("expected exactly one server named \"{name}\", found {count}")]
    AmbiguousServer { name: String, count: usize },

    /// A stored subscriber channel value that cannot be addressed
    #[error("subscriber channel {0:?} is not a chat id or @username")]
    InvalidChannel(String),

    /// Outbound notification failures outside the Telegram API error type
    #[error("notification send failed: {0}")]
    Notification(String),

    /// A verified webhook body that does not carry the expected fields
    #[error("malformed push payload: {0}")]
    Payload(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
