//! Messaging error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Invalid sendSMS payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to send SMS to {to}: {source}")]
    SendSms {
        to: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to emit event {name}: {message}")]
    Event { name: String, message: String },

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Db(#[from] swc_db::DbError),
}

pub type MessagingResult<T> = std::result::Result<T, MessagingError>;
