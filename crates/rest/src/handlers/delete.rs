//! Delete handler.
//!
//! `DELETE /api/{plural}/{id}`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::{EntityRepository, SearchIndex};
use tracing::debug;

use crate::entity::ExposedEntity;
use crate::error::RestResult;
use crate::extractors::PathId;
use crate::responses::{AlertAction, ResponseHeaders};
use crate::state::AppState;

/// Handler for deleting an entity.
///
/// # Response
///
/// - `204 No Content` - Entity deleted from the store (and, best effort,
///   from the index)
/// - `404 Not Found` - Entity does not exist
/// - `409 Conflict` - Other entities still reference it
pub async fn delete_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    PathId(id): PathId,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: EntityRepository<E> + 'static,
    I: SearchIndex<E> + 'static,
{
    debug!(entity = E::NAME, id = %id, "REST request to delete");

    state.entities().delete::<E>(id).await?;

    let headers = ResponseHeaders::new()
        .with_alert(
            state.application_name(),
            E::ALERT_NAME,
            AlertAction::Deleted,
            &id.to_string(),
        )
        .into_header_map();

    Ok((StatusCode::NO_CONTENT, headers).into_response())
}
