//! Services composing the store and the index.
//!
//! - [`QueryService`] - criteria queries (list, page, count) on the store
//! - [`EntityService`] - validated writes mirrored into the index, reads,
//!   free-text search and reindexing

mod entity;
mod query;

pub use entity::EntityService;
pub use query::QueryService;
