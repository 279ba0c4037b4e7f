//! Database error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User action not found: {0}")]
    UserActionNotFound(String),

    #[error("Unknown user action type: {0}")]
    UnknownActionType(String),

    #[error("Invalid decimal in {field}: {value}")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("Failed to encode reason codes: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
