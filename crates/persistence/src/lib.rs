//! Bon Content Service Persistence Layer
//!
//! This crate provides the entity model, criteria queries and storage for
//! the Bon content service: stories, their ordered fragments, per-language
//! translations of fragments and tags.
//!
//! # Features
//!
//! - **Criteria queries**: per-entity filter objects bound from
//!   `field.operator=value` parameters, composed into store-agnostic
//!   specifications and executed as a list, a page or a count
//! - **Dual write**: every save and delete is mirrored into a free-text
//!   search index on a best-effort basis
//! - **SQLite**: store and FTS5 index, in-memory or file based
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite store and FTS5 search index
//!
//! # Architecture
//!
//! - [`model`] - entities, enumerations and identity
//! - [`filter`] - per-kind field filters, predicates and specifications
//! - [`criteria`] - per-entity criteria objects and their field tables
//! - [`core`] - store and index traits
//! - [`service`] - query service and dual-write entity service
//! - [`types`] - pagination
//! - [`error`] - error types for all operations
//! - [`backends`] - backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
//! use bon_content_persistence::criteria::{Criteria, FragmentCriteria};
//! use bon_content_persistence::model::{Story, StoryCategory};
//! use bon_content_persistence::service::{EntityService, QueryService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteBackend::in_memory()?);
//! store.init_schema()?;
//! let index = Arc::new(SqliteSearchIndex::in_memory()?);
//! index.init_schema()?;
//!
//! let entities = EntityService::new(Arc::clone(&store), index);
//! let story = entities
//!     .create(Story::new(StoryCategory::News, "Harvest"))
//!     .await?;
//!
//! let queries = QueryService::new(store);
//! let criteria = FragmentCriteria::from_query_pairs([("storyId.equals", "1")])?;
//! let fragments = queries.find_by_criteria(&criteria).await?;
//! # let _ = (story, fragments);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod criteria;
pub mod error;
pub mod filter;
pub mod model;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use model::{Entity, EntityId};
pub use types::{Page, PageRequest};

// Re-export core traits
pub use core::{ContentIndex, ContentStore, EntityRepository, SearchIndex, SpecificationExecutor};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
