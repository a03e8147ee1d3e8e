//! Read handler.
//!
//! `GET /api/{plural}/{id}`

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::EntityRepository;
use tracing::debug;

use crate::entity::ExposedEntity;
use crate::error::{RestError, RestResult};
use crate::extractors::PathId;
use crate::state::AppState;

/// Handler for reading an entity by ID.
///
/// The entity is returned with its to-many relations (a fragment with its
/// tags).
///
/// # Response
///
/// - `200 OK` - Entity found
/// - `400 Bad Request` - The ID is not an integer
/// - `404 Not Found` - Entity does not exist
pub async fn read_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    PathId(id): PathId,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: EntityRepository<E> + 'static,
    I: Send + Sync + 'static,
{
    debug!(entity = E::NAME, id = %id, "REST request to get");

    match state.entities().find_one::<E>(id).await? {
        Some(entity) => Ok(Json(entity).into_response()),
        None => {
            debug!(entity = E::NAME, id = %id, "Entity not found");
            Err(RestError::NotFound {
                entity: E::NAME.to_string(),
                id: id.to_string(),
            })
        }
    }
}
