//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates resource state errors, validation
//! errors, store constraint errors, search index errors and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The primary error type for all storage operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors (raised before any store interaction)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store constraint violations
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Search index errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to entity state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested entity was not found.
    #[error("entity not found: {entity}/{id}")]
    NotFound { entity: String, id: String },
}

/// Errors related to entity and request validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A new entity was submitted with an identifier.
    #[error("a new {entity} cannot already have an ID")]
    IdentifierPresent { entity: String },

    /// An update was submitted without an identifier.
    #[error("invalid id: {entity} update requires an ID")]
    IdentifierMissing { entity: String },

    /// A field violates its constraint.
    #[error("invalid {entity}.{field}: {message}")]
    InvalidField {
        entity: String,
        field: String,
        message: String,
    },

    /// A criteria parameter could not be parsed or is not allowed.
    #[error("invalid filter parameter '{parameter}': {message}")]
    InvalidFilterParameter { parameter: String, message: String },

    /// A sort directive names an unknown property.
    #[error("invalid sort property '{property}' for {entity}")]
    InvalidSort { entity: String, property: String },
}

impl ValidationError {
    /// Returns the short machine-readable key for this error.
    pub fn error_key(&self) -> &'static str {
        match self {
            ValidationError::IdentifierPresent { .. } => "idexists",
            ValidationError::IdentifierMissing { .. } => "idnull",
            ValidationError::InvalidField { .. } => "validation",
            ValidationError::InvalidFilterParameter { .. } => "invalidfilter",
            ValidationError::InvalidSort { .. } => "invalidsort",
        }
    }
}

/// The kind of store constraint that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A unique index rejected a duplicate value.
    Unique,
    /// A foreign key rejected a dangling or still-referenced row.
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
        }
    }
}

/// Errors raised by the store when a constraint is violated.
#[derive(Error, Debug)]
#[error("{kind} constraint violated on {entity}: {message}")]
pub struct ConstraintError {
    /// Entity whose write was rejected.
    pub entity: String,
    /// Which constraint failed.
    pub kind: ConstraintKind,
    /// Message reported by the store.
    pub message: String,
}

/// Errors related to the search index.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The search index could not be reached or failed internally.
    #[error("search index unavailable: {message}")]
    IndexUnavailable { message: String },

    /// The free-text query could not be parsed.
    #[error("failed to parse search query: {message}")]
    QueryParseError { message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Shorthand for a not-found error.
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        StorageError::Resource(ResourceError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        })
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::not_found("Fragment", 12);
        assert_eq!(err.to_string(), "entity not found: Fragment/12");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_error_keys() {
        let present = ValidationError::IdentifierPresent {
            entity: "Story".to_string(),
        };
        let missing = ValidationError::IdentifierMissing {
            entity: "Story".to_string(),
        };
        assert_eq!(present.error_key(), "idexists");
        assert_eq!(missing.error_key(), "idnull");
        assert!(present.to_string().contains("cannot already have an ID"));
    }

    #[test]
    fn test_constraint_display() {
        let err = ConstraintError {
            entity: "Story".to_string(),
            kind: ConstraintKind::Unique,
            message: "story.name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unique constraint violated on Story: story.name"
        );
    }

    #[test]
    fn test_from_conversion() {
        let err: StorageError = SearchError::IndexUnavailable {
            message: "closed".to_string(),
        }
        .into();
        assert!(matches!(err, StorageError::Search(_)));
        assert!(!err.is_not_found());
    }
}
