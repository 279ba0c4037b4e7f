//! Error types for configuration and projections.

use swc_db::models::UserActionType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid address in {name}: {value}")]
    InvalidAddress { name: String, value: String },
}

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("no {relation} found for id {id} of type {action_type}")]
    MissingRelation {
        relation: &'static str,
        id: String,
        action_type: UserActionType,
    },

    #[error("invalid amount on action {id}: {source}")]
    InvalidAmount {
        id: String,
        #[source]
        source: swc_db::DbError,
    },
}
