//! Core storage traits and abstractions.
//!
//! This module provides the seams between the services and the concrete
//! storage technology:
//!
//! - [`EntityRepository`] - CRUD by identifier on the primary store
//! - [`SpecificationExecutor`] - executes a [`Specification`](crate::filter::Specification)
//!   as a list, a page or a count
//! - [`SearchIndex`] - the secondary free-text index
//!
//! # Trait Hierarchy
//!
//! ```text
//! EntityRepository<E>
//!     └── ContentRepository<E>   (blanket: EntityRepository + SpecificationExecutor)
//!             └── ContentStore    (blanket: ContentRepository for every entity)
//!
//! SearchIndex<E>
//!     └── ContentIndex            (blanket: SearchIndex for every entity)
//! ```
//!
//! The blanket traits exist so that the REST layer can be generic over one
//! store type and one index type while serving all four entities.

mod index;
mod repository;

pub use index::{ContentIndex, SearchIndex};
pub use repository::{ContentRepository, ContentStore, EntityRepository, SpecificationExecutor};
