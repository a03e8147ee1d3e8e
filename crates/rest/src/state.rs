//! Application state for the content REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the entity service (store plus search index), the query
//! service and the server configuration.

use std::sync::Arc;

use bon_content_persistence::service::{EntityService, QueryService};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The store (usually a [`ContentStore`](bon_content_persistence::ContentStore))
/// * `I` - The search index (usually a [`ContentIndex`](bon_content_persistence::ContentIndex))
///
/// # Example
///
/// ```rust,ignore
/// use bon_content_rest::{AppState, ServerConfig};
/// use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
/// use std::sync::Arc;
///
/// let store = Arc::new(SqliteBackend::in_memory()?);
/// let index = Arc::new(SqliteSearchIndex::in_memory()?);
/// let state = AppState::new(store, index, ServerConfig::default());
/// ```
pub struct AppState<S, I> {
    /// Dual-write service over the store and the index.
    entities: EntityService<S, I>,

    /// Criteria queries against the store.
    queries: QueryService<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S and I are wrapped in Arc and don't need to be Clone
impl<S, I> Clone for AppState<S, I> {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            queries: self.queries.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, I> AppState<S, I> {
    /// Creates a new AppState over the given store and index.
    pub fn new(store: Arc<S>, index: Arc<I>, config: ServerConfig) -> Self {
        Self {
            entities: EntityService::new(Arc::clone(&store), index),
            queries: QueryService::new(store),
            config: Arc::new(config),
        }
    }

    /// Returns the entity service.
    pub fn entities(&self) -> &EntityService<S, I> {
        &self.entities
    }

    /// Returns the query service.
    pub fn queries(&self) -> &QueryService<S> {
        &self.queries
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        self.entities.repository()
    }

    /// Returns the search index.
    pub fn index(&self) -> &I {
        self.entities.index()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application name used in alert headers.
    pub fn application_name(&self) -> &str {
        &self.config.application_name
    }

    /// Returns the base URL for the server.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the default page size for list and search results.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    /// Returns the maximum page size for list and search results.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }
}
