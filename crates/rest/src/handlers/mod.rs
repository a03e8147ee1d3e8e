//! HTTP request handlers for the content API.
//!
//! Every handler is generic over the entity, so one set of handlers serves
//! stories, fragments, localizeds and tags:
//!
//! - [`create`] - Create a new entity
//! - [`update`] - Replace an existing entity
//! - [`read`] - Read an entity by ID
//! - [`list`] - List a page of entities matching criteria, or count them
//! - [`delete`] - Delete an entity
//! - [`search`] - Free-text search through the index
//! - [`health`] - Health check endpoint

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod read;
pub mod search;
pub mod update;

// Re-export handlers for convenience
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use list::{count_handler, list_handler};
pub use read::read_handler;
pub use search::search_handler;
pub use update::update_handler;
