//! Free-text search query extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::RestError;

/// Axum extractor for the `query` parameter of `/api/_search/{plural}`.
///
/// The parameter is required. An empty value is passed through and matches
/// every document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(pub String);

impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        super::query_pairs(parts)
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| SearchQuery(value))
            .ok_or_else(|| {
                RestError::bad_request(
                    "queryrequired",
                    "Required request parameter 'query' is not present",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<SearchQuery, RestError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        SearchQuery::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_is_decoded() {
        let query = extract("/api/_search/tags?query=gar*+den&page=1").await.unwrap();
        assert_eq!(query.0, "gar* den");
    }

    #[tokio::test]
    async fn test_missing_query_is_rejected() {
        let err = extract("/api/_search/tags?page=1").await.unwrap_err();
        assert_eq!(err.error_key(), "queryrequired");
    }
}
