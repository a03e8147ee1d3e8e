//! Search index trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::model::{Entity, EntityId, Fragment, Localized, Story, Tag};
use crate::types::{Page, PageRequest};

/// A secondary, denormalized free-text index for one entity type.
///
/// The index is advisory: it may lag the primary store, and callers decide
/// what to do when it fails.
#[async_trait]
pub trait SearchIndex<E: Entity>: Send + Sync {
    /// Returns a human-readable name for this index.
    fn index_name(&self) -> &'static str;

    /// Inserts or replaces the document of `entity`, keyed by its identifier.
    async fn save(&self, entity: &E) -> StorageResult<()>;

    /// Removes the document with identifier `id`. Missing documents are ignored.
    async fn delete_by_id(&self, id: EntityId) -> StorageResult<()>;

    /// Removes every document of this entity type, returning how many were removed.
    async fn clear(&self) -> StorageResult<u64>;

    /// Runs a free-text query and returns one page of matching documents.
    async fn search(&self, query: &str, page: &PageRequest) -> StorageResult<Page<E>>;
}

/// An index serving every content entity.
pub trait ContentIndex:
    SearchIndex<Story> + SearchIndex<Fragment> + SearchIndex<Localized> + SearchIndex<Tag> + 'static
{
}

impl<T> ContentIndex for T where
    T: SearchIndex<Story>
        + SearchIndex<Fragment>
        + SearchIndex<Localized>
        + SearchIndex<Tag>
        + 'static
{
}
