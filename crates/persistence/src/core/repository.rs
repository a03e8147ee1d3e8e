//! Primary store traits.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::filter::Specification;
use crate::model::{Entity, EntityId, Fragment, Localized, Story, Tag};
use crate::types::{Page, PageRequest};

/// CRUD by identifier for one entity type.
///
/// Every method runs in its own store transaction. Mutations never reach the
/// search index; keeping the index in step is the caller's job (see
/// [`EntityService`](crate::service::EntityService)).
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts the entity when it has no identifier, otherwise updates it.
    ///
    /// Returns the stored entity with its identifier. Updating an unknown
    /// identifier fails with not-found.
    async fn save(&self, entity: E) -> StorageResult<E>;

    /// Reads one entity without its to-many relations.
    async fn find_by_id(&self, id: EntityId) -> StorageResult<Option<E>>;

    /// Reads one entity together with its to-many relations.
    async fn find_one_with_relations(&self, id: EntityId) -> StorageResult<Option<E>>;

    /// Reads one unfiltered page.
    async fn find_all(&self, page: &PageRequest) -> StorageResult<Page<E>>;

    /// Loads the to-many relations of already fetched entities.
    async fn load_relations(&self, entities: &mut [E]) -> StorageResult<()>;

    /// Deletes by identifier, detaching it from many-to-many relations.
    ///
    /// Fails with not-found when nothing was deleted.
    async fn delete_by_id(&self, id: EntityId) -> StorageResult<()>;

    /// Counts all stored entities.
    async fn count(&self) -> StorageResult<u64>;
}

/// Executes specifications for one entity type.
#[async_trait]
pub trait SpecificationExecutor<E: Entity>: Send + Sync {
    /// Every match, in ascending identifier order.
    async fn find_all_matching(&self, spec: &Specification) -> StorageResult<Vec<E>>;

    /// One page of matches plus the total match count.
    async fn find_page_matching(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> StorageResult<Page<E>>;

    /// Number of matches, without materializing rows.
    async fn count_matching(&self, spec: &Specification) -> StorageResult<u64>;
}

/// A store that supports CRUD and specification queries for `E`.
pub trait ContentRepository<E: Entity>: EntityRepository<E> + SpecificationExecutor<E> {}

impl<T, E> ContentRepository<E> for T
where
    E: Entity,
    T: EntityRepository<E> + SpecificationExecutor<E>,
{
}

/// A store serving every content entity.
pub trait ContentStore:
    ContentRepository<Story>
    + ContentRepository<Fragment>
    + ContentRepository<Localized>
    + ContentRepository<Tag>
    + 'static
{
}

impl<T> ContentStore for T where
    T: ContentRepository<Story>
        + ContentRepository<Fragment>
        + ContentRepository<Localized>
        + ContentRepository<Tag>
        + 'static
{
}
