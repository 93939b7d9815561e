use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    /// Unique column or fingerprint collision.
    Conflict(String),

    /// Stale optimistic-lock version.
    VersionConflict(String),

    Forbidden(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::VersionConflict(msg) => write!(f, "Version conflict: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Machine-readable error code carried in the response envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::DatabaseError(_) => "database_error",
            Self::ValidationError(_) => "validation_error",
            Self::Conflict(_) => "uniqueness_conflict",
            Self::VersionConflict(_) => "version_conflict",
            Self::Forbidden(_) => "forbidden",
            Self::InternalError(_) => "internal_error",
            Self::Unauthorized(_) => "unauthorized",
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::VersionConflict(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_message = match &self {
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "A database error occurred".to_string()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            Self::NotFound(msg)
            | Self::ValidationError(msg)
            | Self::Conflict(msg)
            | Self::VersionConflict(msg)
            | Self::Forbidden(msg)
            | Self::Unauthorized(msg) => msg.clone(),
        };

        let body = ApiResponse::<()>::error(self.code(), error_message);
        (self.status(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::NotFound(format!("{msg} not found")),
            ServiceError::UniquenessConflict(msg) => Self::Conflict(msg),
            ServiceError::VersionConflict(msg) => Self::VersionConflict(msg),
            ServiceError::AuthorizationDenied(msg) => Self::Forbidden(msg),
            ServiceError::Unauthorized(msg) => Self::Unauthorized(msg),
            ServiceError::Validation(msg) => Self::ValidationError(msg),
            ServiceError::Database(msg) => Self::DatabaseError(msg),
            ServiceError::Internal(msg) => Self::InternalError(msg),
            err @ ServiceError::Decode { .. } => Self::InternalError(err.to_string()),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
