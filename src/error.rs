//! Error types for the catalog server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    StorageFailure = 3,
    NoSuchRecord = 5,
    Duplicate = 8,
    BadValue = 18,
    UnresolvedReference = 22,
    StillReferenced = 23,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Case-insensitive name or ISBN collision
    #[error("{entity} with {field} '{value}' already exists")]
    ConstraintViolation {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A foreign reference does not resolve to an existing record
    #[error("{entity}.{field} references missing record {value}")]
    Reference {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Delete attempted on a record that dependents still point at
    #[error("{entity} {id} is still referenced by {count} {dependent} record(s)")]
    ReferentialIntegrity {
        entity: &'static str,
        id: String,
        dependent: &'static str,
        count: usize,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn constraint(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        AppError::ConstraintViolation {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn reference(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        AppError::Reference {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn still_referenced(
        entity: &'static str,
        id: impl ToString,
        dependent: &'static str,
        count: usize,
    ) -> Self {
        AppError::ReferentialIntegrity {
            entity,
            id: id.to_string(),
            dependent,
            count,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Entity kind involved in the failure, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Conflicting or unresolved field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, entity, field, value) = match self {
            AppError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoSuchRecord,
                Some(entity.to_string()),
                Some("id".to_string()),
                Some(id),
            ),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, None, None, None),
            AppError::ConstraintViolation { entity, field, value } => (
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                Some(entity.to_string()),
                Some(field.to_string()),
                Some(value),
            ),
            AppError::Reference { entity, field, value } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::UnresolvedReference,
                Some(entity.to_string()),
                Some(field.to_string()),
                Some(value),
            ),
            AppError::ReferentialIntegrity { entity, id, .. } => (
                StatusCode::CONFLICT,
                ErrorCode::StillReferenced,
                Some(entity.to_string()),
                Some("id".to_string()),
                Some(id),
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                let body = Json(ErrorResponse {
                    code: ErrorCode::StorageFailure as u32,
                    error: format!("{:?}", ErrorCode::StorageFailure),
                    message: "Storage error".to_string(),
                    entity: None,
                    field: None,
                    value: None,
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            entity,
            field,
            value,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
