//! Create handler.
//!
//! `POST /api/{plural}`

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

/// Handler for creating an entity.
///
/// The store assigns the identifier; a body that already carries one is
/// rejected.
///
/// # Response
///
/// - `201 Created` - Entity created, `Location` points at it
/// - `400 Bad Request` - Body has an `id` (`idexists`) or fails validation
/// - `409 Conflict` - A store constraint rejected the entity
///
/// # Example
///
/// ```http
/// POST /api/tags HTTP/1.1
/// Content-Type: application/json
///
/// {"name": "gardening"}
/// ```
pub async fn create_handler<E, S, I>(
    State(state): State<AppState<S, I>>,
    JsonBody(entity): JsonBody<E>,
) -> RestResult<Response>
where
    E: ExposedEntity,
    S: EntityRepository<E> + 'static,
    I: SearchIndex<E> + 'static,
{
    debug!(entity = E::NAME, "REST request to save");

    let created = state.entities().create(entity).await?;
    let id = created.id().map(|id| id.to_string()).unwrap_or_default();

    debug!(entity = E::NAME, id = %id, "Entity created");

    let headers = ResponseHeaders::new()
        .with_location(&format!("/api/{}/{}", E::PLURAL, id))
        .with_alert(
            state.application_name(),
            E::ALERT_NAME,
            AlertAction::Created,
            &id,
        )
        .into_header_map();

    Ok((StatusCode::CREATED, headers, Json(created)).into_response())
}
