//! # bon-content-rest - Content REST API
//!
//! This crate exposes the Bon content service over HTTP: CRUD, criteria
//! listing and counting, and free-text search for stories, fragments,
//! localized fragments and tags.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use bon_content_rest::{create_app_with_config, ServerConfig};
//! use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create the store and the search index
//!     let store = SqliteBackend::open("bon-content.db")?;
//!     store.init_schema()?;
//!     let index = SqliteSearchIndex::open("bon-content-index.db")?;
//!     index.init_schema()?;
//!
//!     // Create the Axum application
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(Arc::new(store), Arc::new(index), config);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! `{plural}` is one of `stories`, `fragments`, `localizeds`, `tags`.
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | create | POST | `/api/{plural}` |
//! | update | PUT | `/api/{plural}` |
//! | list | GET | `/api/{plural}?criteria&page&size&sort&eagerload` |
//! | count | GET | `/api/{plural}/count?criteria` |
//! | read | GET | `/api/{plural}/{id}` |
//! | delete | DELETE | `/api/{plural}/{id}` |
//! | search | GET | `/api/_search/{plural}?query&page&size` |
//! | health | GET | `/health` |
//!
//! Criteria are written `field.operator=value`, e.g.
//! `/api/fragments?storyId.equals=1&width.lessThan=2&tagId.in=3,4`.
//!
//! ## HTTP Headers
//!
//! - `Location` - on create
//! - `X-Total-Count` and `Link` - on list and search
//! - `X-{app}-alert` / `X-{app}-params` - on create, update and delete
//! - `X-{app}-error` - on failures
//!
//! ## Error Handling
//!
//! All errors are returned as `{"title", "status", "detail", "errorKey"}`
//! bodies with appropriate HTTP status codes:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Bad request / validation error / malformed filter |
//! | 404 | Entity not found |
//! | 408 | Request timeout |
//! | 409 | Store constraint violated |
//! | 415 | Body is not JSON |
//! | 500 | Internal server error |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and problem bodies
//! - [`config`] - Server configuration
//! - [`state`] - Application state (services, configuration)
//! - [`entity`] - Entities exposed over HTTP
//! - [`handlers`] - HTTP request handlers for each interaction
//! - [`middleware`] - Axum middleware (error alert header)
//! - [`extractors`] - Axum extractors for pagination, criteria and bodies
//! - [`responses`] - Response header generation
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use entity::ExposedEntity;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use bon_content_persistence::core::{ContentIndex, ContentStore, EntityRepository, SearchIndex};
use bon_content_persistence::model::Story;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
pub fn create_app<S, I>(store: Arc<S>, index: Arc<I>) -> Router
where
    S: ContentStore,
    I: ContentIndex,
{
    create_app_with_config(store, index, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up the complete content REST API with all handlers,
/// middleware, and configuration.
///
/// # Arguments
///
/// * `store` - The primary store
/// * `index` - The search index kept in sync with the store
/// * `config` - Server configuration
pub fn create_app_with_config<S, I>(store: Arc<S>, index: Arc<I>, config: ServerConfig) -> Router
where
    S: ContentStore,
    I: ContentIndex,
{
    info!(
        backend = EntityRepository::<Story>::backend_name(&*store),
        index = SearchIndex::<Story>::index_name(&*index),
        "Creating REST API server"
    );

    // Create application state
    let state = AppState::new(store, index, config.clone());

    // Build the router with all content routes
    let router = routing::create_routes(state).layer(axum::middleware::from_fn_with_state(
        Arc::<str>::from(config.application_name.as_str()),
        middleware::error_alert_middleware,
    ));

    // Add request IDs if enabled
    let router = if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    };

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    // Clients read paging and alert information from these
    let app = config.application_name.to_ascii_lowercase();
    let exposed: Vec<axum::http::HeaderName> = [
        "x-total-count".to_string(),
        "link".to_string(),
        "location".to_string(),
        format!("x-{}-alert", app),
        format!("x-{}-params", app),
        format!("x-{}-error", app),
    ]
    .iter()
    .filter_map(|name| name.parse().ok())
    .collect();
    cors.expose_headers(exposed)
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bon_content_server={level},bon_content_rest={level},bon_content_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
