//! Content route configuration.
//!
//! Defines all routes for the content REST API.

use axum::{Router, routing::get};
use bon_content_persistence::core::{ContentIndex, ContentRepository, ContentStore, SearchIndex};
use bon_content_persistence::model::{Fragment, Localized, Story, Tag};

use crate::entity::ExposedEntity;
use crate::handlers;
use crate::state::AppState;

/// Creates all content REST API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
///
/// ## Per entity (`stories`, `fragments`, `localizeds`, `tags`)
/// - `GET /api/{plural}` - List by criteria
/// - `POST /api/{plural}` - Create
/// - `PUT /api/{plural}` - Update
/// - `GET /api/{plural}/count` - Count by criteria
/// - `GET /api/{plural}/{id}` - Read
/// - `DELETE /api/{plural}/{id}` - Delete
/// - `GET /api/_search/{plural}` - Free-text search
pub fn create_routes<S, I>(state: AppState<S, I>) -> Router
where
    S: ContentStore,
    I: ContentIndex,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<S, I>))
        // Entity routes
        .merge(entity_routes::<Story, S, I>())
        .merge(entity_routes::<Fragment, S, I>())
        .merge(entity_routes::<Localized, S, I>())
        .merge(entity_routes::<Tag, S, I>())
        // State
        .with_state(state)
}

/// Creates the routes of one entity.
pub fn entity_routes<E, S, I>() -> Router<AppState<S, I>>
where
    E: ExposedEntity,
    S: ContentRepository<E> + 'static,
    I: SearchIndex<E> + 'static,
{
    let collection = format!("/api/{}", E::PLURAL);

    Router::new()
        .route(
            &collection,
            get(handlers::list_handler::<E, S, I>)
                .post(handlers::create_handler::<E, S, I>)
                .put(handlers::update_handler::<E, S, I>),
        )
        .route(
            &format!("{}/count", collection),
            get(handlers::count_handler::<E, S, I>),
        )
        .route(
            &format!("{}/{{id}}", collection),
            get(handlers::read_handler::<E, S, I>).delete(handlers::delete_handler::<E, S, I>),
        )
        .route(
            &format!("/api/_search/{}", E::PLURAL),
            get(handlers::search_handler::<E, S, I>),
        )
}
