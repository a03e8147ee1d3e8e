//! List and count handlers.
//!
//! - `GET /api/{plural}?{criteria}&page&size&sort&eagerload`
//! - `GET /api/{plural}/count?{criteria}`

use axum::{
    Json,
    extract::{OriginalUri, State},
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::{EntityRepository, SpecificationExecutor};
use tracing::debug;

use crate::entity::ExposedEntity;
use crate::error::RestResult;
use crate::extractors::{CriteriaQuery, Pagination};
use crate::responses::ResponseHeaders;
use crate::state::AppState;

/// Handler for listing a page of entities matching criteria.
///
/// Without criteria every entity matches. Relations are loaded only with
/// `eagerload=true`.
///
/// # Response
///
/// - `200 OK` - JSON array, with `X-Total-Count` and `Link` headers
/// - `400 Bad Request` - Malformed filter, page or sort parameter
///
/// # Example
///
/// ```http
/// GET /api/fragments?storyId.equals=1&width.lessThan=2&sort=orderNo,asc HTTP/1.1
/// ```
pub async fn list_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    OriginalUri(uri): OriginalUri,
    pagination: Pagination,
    CriteriaQuery(criteria): CriteriaQuery<E::Criteria>,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: EntityRepository<E> + SpecificationExecutor<E> + 'static,
    I: Send + Sync + 'static,
{
    debug!(
        entity = E::NAME,
        ?criteria,
        page = pagination.page(),
        size = pagination.size(),
        eager = pagination.eager(),
        "REST request to get by criteria"
    );

    let request = pagination.page_request();
    let mut page = state
        .queries()
        .find_page_by_criteria(&criteria, &request)
        .await?;

    if pagination.eager() {
        state.entities().load_relations(&mut page.content).await?;
    }

    let headers = ResponseHeaders::new()
        .with_pagination(state.base_url(), &uri, &page)
        .into_header_map();

    Ok((headers, Json(page.content)).into_response())
}

/// Handler for counting entities matching criteria.
///
/// # Response
///
/// - `200 OK` - The count as a bare JSON number
/// - `400 Bad Request` - Malformed filter parameter
pub async fn count_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    CriteriaQuery(criteria): CriteriaQuery<E::Criteria>,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: SpecificationExecutor<E> + 'static,
    I: Send + Sync + 'static,
{
    debug!(entity = E::NAME, ?criteria, "REST request to count by criteria");

    let count = state.queries().count_by_criteria(&criteria).await?;
    Ok(Json(count).into_response())
}
