//! Update handler.
//!
//! `PUT /api/{plural}`

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::{EntityRepository, SearchIndex};
use tracing::debug;

use crate::entity::ExposedEntity;
use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::responses::{AlertAction, ResponseHeaders};
use crate::state::AppState;

/// Handler for replacing an entity.
///
/// The identifier travels in the body. For fragments the tag list is
/// written as a whole.
///
/// # Response
///
/// - `200 OK` - Entity replaced
/// - `400 Bad Request` - Body has no `id` (`idnull`) or fails validation
/// - `404 Not Found` - No entity with that `id`
/// - `409 Conflict` - A store constraint rejected the entity
pub async fn update_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    JsonBody(entity): JsonBody<E>,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: EntityRepository<E> + 'static,
    I: SearchIndex<E> + 'static,
{
    debug!(entity = E::NAME, id = ?entity.id(), "REST request to update");

    let updated = state.entities().update(entity).await?;
    let id = updated.id().map(|id| id.to_string()).unwrap_or_default();

    let headers = ResponseHeaders::new()
        .with_alert(
            state.application_name(),
            E::ALERT_NAME,
            AlertAction::Updated,
            &id,
        )
        .into_header_map();

    Ok((StatusCode::OK, headers, Json(updated)).into_response())
}
