use crate::api::models::envelope::ErrorResponse;
use crate::db::errors::DbError;
use crate::types::{PRODUCT_RESOURCE, ProductId};
use crate::validation::ValidationErrors;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

/// Message attached to every 422 response
pub const VALIDATION_MESSAGE: &str = "The given data was invalid";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed request: unparseable body, bad path parameter
    #[error("{message}")]
    BadRequest { message: String },

    /// One or more payload fields failed validation
    #[error("The given data was invalid: {0}")]
    Validation(ValidationErrors),

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// A failed operation, reported to the client as "Failed to {operation}"
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn product_not_found(id: ProductId) -> Self {
        Error::NotFound {
            resource: PRODUCT_RESOURCE.to_string(),
            id: id.to_string(),
        }
    }

    /// Replace an unexpected failure with a generic "Failed to {operation}" error.
    ///
    /// Client-facing errors (validation, not found, bad request, constraint violations) pass
    /// through unchanged. Anything else is logged here with its full context and the client only
    /// sees the operation name.
    pub fn or_internal(self, operation: &str) -> Self {
        match self {
            Error::Database(DbError::Other(_)) | Error::Other(_) => {
                tracing::error!(error = %format!("{self:#}"), "Failed to {operation}");
                Error::Internal {
                    operation: operation.to_string(),
                }
            }
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::CheckViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Validation(_) => VALIDATION_MESSAGE.to_string(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Internal { operation } => format!("Failed to {operation}"),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::Validation(_) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let mut body = ErrorResponse::new(self.user_message());
        if let Error::Validation(errors) = self {
            body = body.with_errors(errors);
        }

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
