//! SQLite backend implementation.
//!
//! This module provides the SQLite implementation of the store traits and of
//! the search index. It supports both in-memory databases (great for testing)
//! and file-based databases (for development and small deployments).
//!
//! # Features
//!
//! - In-memory and file-based modes
//! - CRUD by identifier with foreign keys enforced
//! - Criteria specifications rendered to SQL with one relation join per condition
//! - Fragment tags stored in a join table and written as a whole
//! - An FTS5 search index kept in a separate database
//!
//! # Example
//!
//! ```no_run
//! use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory store and index
//! let backend = SqliteBackend::in_memory()?;
//! let index = SqliteSearchIndex::in_memory()?;
//!
//! // Initialize the schemas
//! backend.init_schema()?;
//! index.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE story (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     category TEXT NOT NULL,
//!     name TEXT NOT NULL,          -- unique
//!     visibility TEXT
//! );
//!
//! CREATE TABLE fragment (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     template TEXT NOT NULL,
//!     name TEXT NOT NULL,
//!     ...
//!     order_no INTEGER NOT NULL,
//!     story_id INTEGER NOT NULL REFERENCES story(id)
//! );
//!
//! CREATE TABLE localized (..., fragment_id INTEGER NOT NULL REFERENCES fragment(id));
//! CREATE TABLE tag (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
//! CREATE TABLE fragment_tag (fragment_id, tag_id, PRIMARY KEY (fragment_id, tag_id));
//! ```

mod backend;
mod index;
mod mapping;
mod query_builder;
mod repository;
mod schema;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use index::SqliteSearchIndex;
pub use query_builder::{QueryBuilder, SqlFragment, SqlParam};
pub use schema::SCHEMA_VERSION;
