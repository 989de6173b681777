use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::utils::archive::ArchiveError;

/// Field name -> list of messages for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `NO_FILES`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Invalid upload fields")]
    pub message: String,
    /// Per-field messages, present on field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!({"file_name": ["This field may not be blank."]}))]
    pub fields: Option<FieldErrors>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidFields(FieldErrors),
    NotFound(String),
    /// A lookup succeeded but there is nothing to return, e.g. no files to zip.
    EmptyResult(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                    fields: None,
                },
            ),
            AppError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: "Invalid upload fields".into(),
                    fields: Some(fields),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                    fields: None,
                },
            ),
            AppError::EmptyResult(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NO_FILES",
                    message: msg,
                    fields: None,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                        fields: None,
                    },
                )
            }
        }
    }

    /// A single-field validation failure.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        AppError::InvalidFields(BTreeMap::from([(name.to_string(), vec![message.into()])]))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                tracing::warn!(path = %path, "Stored file is missing");
                AppError::NotFound("File not found".into())
            }
            StorageError::SizeLimitExceeded { limit, .. } => {
                AppError::Validation(format!("File exceeds maximum size of {limit} bytes"))
            }
            StorageError::InvalidName(msg) => AppError::Validation(msg),
            StorageError::Io(e) => AppError::Internal(format!("Storage IO error: {e}")),
        }
    }
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Storage(e) => e.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}
