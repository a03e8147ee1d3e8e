//! Error types for the content REST API.
//!
//! This module defines the error type used throughout the REST API layer,
//! with automatic conversion to JSON problem responses.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are mapped to HTTP status codes
//! and a short error key:
//!
//! | Storage Error | HTTP Status | Error Key |
//! |--------------|-------------|-----------|
//! | NotFound | 404 | notfound |
//! | IdentifierPresent | 400 | idexists |
//! | IdentifierMissing | 400 | idnull |
//! | InvalidField | 400 | validation |
//! | InvalidFilterParameter | 400 | invalidfilter |
//! | InvalidSort | 400 | invalidsort |
//! | QueryParseError | 400 | invalidquery |
//! | Unique constraint | 409 | unique |
//! | ForeignKey constraint | 409 | foreignkey |
//! | IndexUnavailable / BackendError | 500 | internal |
//!
//! Every error response carries a body of the form
//! `{"title", "status", "detail", "errorKey"}`. The error key is also stored
//! in the response extensions as [`ErrorKey`] so the alert middleware can
//! publish it as an `X-{app}-error` header.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bon_content_persistence::error::{
    ConstraintError, ConstraintKind, ResourceError, SearchError, StorageError, ValidationError,
};
use std::fmt;
use tracing::error;

/// Content type of error bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// The primary error type for REST API operations.
///
/// This enum provides semantic error types that map cleanly to HTTP status codes.
#[derive(Debug)]
pub enum RestError {
    /// Bad request - invalid input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
        /// Short machine readable key, e.g. `idexists`.
        error_key: String,
    },

    /// Entity not found (HTTP 404).
    NotFound {
        /// The entity name (e.g., "Story").
        entity: String,
        /// The entity ID.
        id: String,
    },

    /// Store constraint violated (HTTP 409).
    Conflict {
        /// Message describing the conflict.
        message: String,
        /// Short machine readable key, e.g. `unique`.
        error_key: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

/// Error key of a failed response, carried in the response extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorKey(pub String);

impl RestError {
    /// Creates a bad request error with the given key.
    pub fn bad_request(error_key: impl Into<String>, message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
            error_key: error_key.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error key for this error.
    pub fn error_key(&self) -> &str {
        match self {
            RestError::BadRequest { error_key, .. } | RestError::Conflict { error_key, .. } => {
                error_key
            }
            RestError::NotFound { .. } => "notfound",
            RestError::UnsupportedMediaType { .. } => "unsupportedmediatype",
            RestError::InternalError { .. } => "internal",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message, .. } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::NotFound { entity, id } => {
                write!(f, "Entity not found: {}/{}", entity, id)
            }
            RestError::Conflict { message, .. } => {
                write!(f, "Conflict: {}", message)
            }
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            RestError::BadRequest { message, .. } | RestError::Conflict { message, .. } => {
                message.clone()
            }
            RestError::NotFound { entity, id } => format!("{} {} not found", entity, id),
            RestError::UnsupportedMediaType { content_type } => {
                format!("Content type '{}' is not supported", content_type)
            }
            RestError::InternalError { message } => message.clone(),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %detail, "Request failed");
        }

        let error_key = self.error_key().to_string();
        let body = create_problem(status, &detail, &error_key);

        let mut response =
            (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(body)).into_response();
        response.extensions_mut().insert(ErrorKey(error_key));
        response
    }
}

/// Creates the JSON problem body.
fn create_problem(status: StatusCode, detail: &str, error_key: &str) -> serde_json::Value {
    serde_json::json!({
        "title": status.canonical_reason().unwrap_or("Error"),
        "status": status.as_u16(),
        "detail": detail,
        "errorKey": error_key
    })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Constraint(e) => e.into(),
            StorageError::Search(e) => e.into(),
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { entity, id } => RestError::NotFound { entity, id },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::BadRequest {
            error_key: err.error_key().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ConstraintError> for RestError {
    fn from(err: ConstraintError) -> Self {
        let error_key = match err.kind {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreignkey",
        };
        RestError::Conflict {
            error_key: error_key.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SearchError> for RestError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::QueryParseError { .. } => RestError::BadRequest {
                error_key: "invalidquery".to_string(),
                message: err.to_string(),
            },
            SearchError::IndexUnavailable { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            error_key: "invalidjson".to_string(),
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
