//! Health check endpoint handler.
//!
//! Provides a simple health check endpoint for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bon_content_persistence::core::{EntityRepository, SearchIndex};
use bon_content_persistence::model::Story;
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Returns a simple health status naming the store backend and the search
/// index, useful for load balancers and monitoring systems.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// - `200 OK` - Server is healthy
pub async fn health_handler<S, I>(State(state): State<AppState<S, I>>) -> RestResult<Response>
where
    S: EntityRepository<Story> + 'static,
    I: SearchIndex<Story> + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": EntityRepository::<Story>::backend_name(state.store()),
        "index": SearchIndex::<Story>::index_name(state.index()),
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}
