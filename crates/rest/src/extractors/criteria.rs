//! Criteria extractor.
//!
//! Binds a criteria object from `field.operator=value` query pairs. Paging
//! parameters and unknown fields are ignored; a known field with an unknown
//! operator or an unparsable value is rejected.

use axum::{extract::FromRequestParts, http::request::Parts};
use bon_content_persistence::criteria::Criteria;

use crate::error::RestError;

/// Axum extractor for a criteria object.
///
/// # Example
///
/// ```rust,ignore
/// use bon_content_persistence::criteria::FragmentCriteria;
/// use bon_content_rest::extractors::CriteriaQuery;
///
/// async fn count_handler(CriteriaQuery(criteria): CriteriaQuery<FragmentCriteria>) {
///     // GET /api/fragments/count?width.lessThan=2&tagId.in=3,4
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaQuery<C>(pub C);

impl<C> CriteriaQuery<C> {
    /// Returns the bound criteria.
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<S, C> FromRequestParts<S> for CriteriaQuery<C>
where
    S: Send + Sync,
    C: Criteria,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = super::query_pairs(parts);
        let criteria = C::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        Ok(CriteriaQuery(criteria))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use bon_content_persistence::criteria::StoryCriteria;

    async fn extract(uri: &str) -> Result<StoryCriteria, RestError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        CriteriaQuery::<StoryCriteria>::from_request_parts(&mut parts, &())
            .await
            .map(CriteriaQuery::into_inner)
    }

    #[tokio::test]
    async fn test_binds_encoded_values() {
        let criteria = extract("/api/stories?name.contains=Harvest%20day&page=2")
            .await
            .unwrap();
        assert_eq!(
            criteria.name.unwrap().contains.as_deref(),
            Some("Harvest day")
        );
    }

    #[tokio::test]
    async fn test_no_query_is_empty_criteria() {
        let criteria = extract("/api/stories").await.unwrap();
        assert!(criteria.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_value_is_bad_request() {
        let err = extract("/api/stories?id.equals=abc").await.unwrap_err();
        assert_eq!(err.error_key(), "invalidfilter");
    }
}
