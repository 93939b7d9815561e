//! Error taxonomy shared by the account, auth, department and link services.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::crypto::CodecError;
use crate::domain::authz::Denied;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),

    /// A fingerprint or username collides with an existing row.
    #[error("{0}")]
    UniquenessConflict(String),

    /// The caller's version is stale; re-fetch and retry.
    #[error("{0}")]
    VersionConflict(String),

    /// Stored ciphertext could not be decoded.
    #[error("failed to decode {entity} {id}: {source}")]
    Decode {
        entity: &'static str,
        id: i32,
        #[source]
        source: CodecError,
    },

    #[error("{0}")]
    AuthorizationDenied(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id}"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::UniquenessConflict(msg.into())
    }

    #[must_use]
    pub fn stale_version(id: i32, current: i32) -> Self {
        Self::VersionConflict(format!(
            "Account {id} was modified by someone else (current version {current})"
        ))
    }

    #[must_use]
    pub const fn decode(entity: &'static str, id: i32, source: CodecError) -> Self {
        Self::Decode { entity, id, source }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::UniquenessConflict("A record with this value already exists".to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<Denied> for ServiceError {
    fn from(err: Denied) -> Self {
        Self::AuthorizationDenied(err.0.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
