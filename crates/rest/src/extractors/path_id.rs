//! Path identifier extractor.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use bon_content_persistence::model::EntityId;

use crate::error::RestError;

/// Axum extractor for the `{id}` path segment.
///
/// A segment that is not an integer is a bad request rather than a routing
/// miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub EntityId);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::bad_request("invalidid", e.body_text()))?;

        raw.parse::<EntityId>().map(PathId).map_err(|_| {
            RestError::bad_request("invalidid", format!("Invalid id '{}'", raw))
        })
    }
}
