//! Axum extractors for the content API.
//!
//! This module provides custom Axum extractors for common request parts:
//!
//! - [`Pagination`] - `page`, `size`, repeatable `sort` and `eagerload`
//! - [`CriteriaQuery`] - a criteria object bound from `field.operator=value` pairs
//! - [`SearchQuery`] - the mandatory `query` of free-text search
//! - [`PathId`] - a numeric entity identifier from the path
//! - [`JsonBody`] - a JSON request body with problem-style rejections
//!
//! All extractors reject with [`RestError`](crate::error::RestError), so a bad
//! request renders the same problem body as any other failure.

mod criteria;
mod json_body;
mod pagination;
mod path_id;
mod search_query;

pub use criteria::CriteriaQuery;
pub use json_body::JsonBody;
pub use pagination::Pagination;
pub use path_id::PathId;
pub use search_query::SearchQuery;

use axum::http::request::Parts;

/// Decodes the query string into owned pairs, keeping repeated keys.
pub(crate) fn query_pairs(parts: &Parts) -> Vec<(String, String)> {
    parts
        .uri
        .query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
