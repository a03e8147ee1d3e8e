//! Search handler.
//!
//! `GET /api/_search/{plural}?query=...&page&size`

use axum::{
    Json,
    extract::{OriginalUri, State},
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::SearchIndex;
use tracing::debug;

use crate::entity::ExposedEntity;
use crate::error::RestResult;
use crate::extractors::{Pagination, SearchQuery};
use crate::responses::ResponseHeaders;
use crate::state::AppState;

/// Handler for free-text search.
///
/// Queries the search index only. Terms are all required, a trailing `*`
/// matches a prefix and `*` alone matches everything. Results come back in
/// relevance order; `sort` is ignored.
///
/// # Response
///
/// - `200 OK` - JSON array with pagination headers; empty when the index is
///   unavailable
/// - `400 Bad Request` - `query` is missing or cannot be parsed
pub async fn search_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    OriginalUri(uri): OriginalUri,
    pagination: Pagination,
    SearchQuery(query): SearchQuery,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: Send + Sync + 'static,
    I: SearchIndex<E> + 'static,
{
    debug!(
        entity = E::NAME,
        query = %query,
        page = pagination.page(),
        size = pagination.size(),
        "REST request to search"
    );

    let page = state
        .entities()
        .search::<E>(&query, &pagination.page_request())
        .await?;

    let headers = ResponseHeaders::new()
        .with_pagination(state.base_url(), &uri, &page)
        .into_header_map();

    Ok((headers, Json(page.content)).into_response())
}
