//! Dual-write entity service.
//!
//! Writes go to the primary store first and are then mirrored into the
//! search index. The two writes are not atomic: a failed index write is
//! logged and swallowed, and [`EntityService::reindex`] repairs the drift.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::{EntityRepository, SearchIndex};
use crate::error::{SearchError, StorageError, StorageResult, ValidationError};
use crate::model::{Entity, EntityId};
use crate::types::{Page, PageRequest};

/// CRUD and search over one store and one index, for every entity type.
pub struct EntityService<R, I> {
    repository: Arc<R>,
    index: Arc<I>,
}

impl<R, I> Clone for EntityService<R, I> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            index: Arc::clone(&self.index),
        }
    }
}

impl<R, I> EntityService<R, I> {
    /// Creates a service writing to `repository` and mirroring into `index`.
    pub fn new(repository: Arc<R>, index: Arc<I>) -> Self {
        Self { repository, index }
    }

    /// Returns the primary store.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Returns the search index.
    pub fn index(&self) -> &Arc<I> {
        &self.index
    }

    /// Validates and upserts `entity`, then mirrors it into the index.
    ///
    /// The returned entity carries its assigned identifier. An index failure
    /// does not fail the save.
    pub async fn save<E>(&self, entity: E) -> StorageResult<E>
    where
        E: Entity,
        R: EntityRepository<E>,
        I: SearchIndex<E>,
    {
        debug!(entity = E::NAME, id = ?entity.id(), "Request to save");
        entity.validate()?;
        let saved = self.repository.save(entity).await?;

        if let Err(e) = self.index.save(&saved).await {
            warn!(
                entity = E::NAME,
                id = ?saved.id(),
                index = self.index.index_name(),
                error = %e,
                "Search index write failed; stored entity kept"
            );
        }
        Ok(saved)
    }

    /// Saves a new entity, rejecting one that already has an identifier.
    pub async fn create<E>(&self, entity: E) -> StorageResult<E>
    where
        E: Entity,
        R: EntityRepository<E>,
        I: SearchIndex<E>,
    {
        if entity.id().is_some() {
            return Err(ValidationError::IdentifierPresent {
                entity: E::NAME.to_string(),
            }
            .into());
        }
        self.save(entity).await
    }

    /// Saves an existing entity, rejecting one without an identifier.
    pub async fn update<E>(&self, entity: E) -> StorageResult<E>
    where
        E: Entity,
        R: EntityRepository<E>,
        I: SearchIndex<E>,
    {
        if entity.id().is_none() {
            return Err(ValidationError::IdentifierMissing {
                entity: E::NAME.to_string(),
            }
            .into());
        }
        self.save(entity).await
    }

    /// Returns one unfiltered page, with to-many relations when `eager`.
    pub async fn find_all<E>(&self, page: &PageRequest, eager: bool) -> StorageResult<Page<E>>
    where
        E: Entity,
        R: EntityRepository<E>,
    {
        debug!(entity = E::NAME, page = page.page, size = page.size, eager, "Request to get all");
        let mut result = self.repository.find_all(page).await?;
        if eager {
            self.repository.load_relations(&mut result.content).await?;
        }
        Ok(result)
    }

    /// Returns one entity with its to-many relations.
    pub async fn find_one<E>(&self, id: EntityId) -> StorageResult<Option<E>>
    where
        E: Entity,
        R: EntityRepository<E>,
    {
        debug!(entity = E::NAME, %id, "Request to get");
        self.repository.find_one_with_relations(id).await
    }

    /// Loads the to-many relations of `entities`.
    pub async fn load_relations<E>(&self, entities: &mut [E]) -> StorageResult<()>
    where
        E: Entity,
        R: EntityRepository<E>,
    {
        self.repository.load_relations(entities).await
    }

    /// Deletes from the store, then from the index.
    ///
    /// Fails with not-found when the store has no such entity. An index
    /// failure does not fail the delete.
    pub async fn delete<E>(&self, id: EntityId) -> StorageResult<()>
    where
        E: Entity,
        R: EntityRepository<E>,
        I: SearchIndex<E>,
    {
        debug!(entity = E::NAME, %id, "Request to delete");
        self.repository.delete_by_id(id).await?;

        if let Err(e) = self.index.delete_by_id(id).await {
            warn!(
                entity = E::NAME,
                %id,
                index = self.index.index_name(),
                error = %e,
                "Search index delete failed; stale document left behind"
            );
        }
        Ok(())
    }

    /// Runs a free-text query against the index only.
    ///
    /// A failing index yields an empty page. A query the index cannot parse
    /// is still reported to the caller.
    pub async fn search<E>(&self, query: &str, page: &PageRequest) -> StorageResult<Page<E>>
    where
        E: Entity,
        I: SearchIndex<E>,
    {
        debug!(entity = E::NAME, query, page = page.page, size = page.size, "Request to search");
        match self.index.search(query, page).await {
            Ok(result) => Ok(result),
            Err(e @ StorageError::Search(SearchError::QueryParseError { .. })) => Err(e),
            Err(e) => {
                warn!(
                    entity = E::NAME,
                    index = self.index.index_name(),
                    error = %e,
                    "Search index query failed; returning no results"
                );
                Ok(Page::empty(page))
            }
        }
    }

    /// Rebuilds the index documents of type `E` from the store.
    ///
    /// Existing documents of the type are purged first, so entities removed
    /// from the store outside this service stop matching. Entities are then
    /// read in pages of `batch_size`, with their relations. Returns the
    /// number of documents written; individual failures are logged and
    /// skipped.
    pub async fn reindex<E>(&self, batch_size: u32) -> StorageResult<u64>
    where
        E: Entity,
        R: EntityRepository<E>,
        I: SearchIndex<E>,
    {
        let purged = SearchIndex::<E>::clear(&*self.index).await?;
        debug!(entity = E::NAME, purged, "Purged index documents before reindex");

        let mut request = PageRequest::new(0, batch_size.max(1));
        let mut indexed = 0u64;
        let mut failed = 0u64;

        loop {
            let mut page = self.repository.find_all(&request).await?;
            self.repository.load_relations(&mut page.content).await?;

            for entity in &page.content {
                match self.index.save(entity).await {
                    Ok(()) => indexed += 1,
                    Err(e) => {
                        failed += 1;
                        warn!(entity = E::NAME, id = ?entity.id(), error = %e, "Reindex failed");
                    }
                }
            }

            if !page.has_next() {
                break;
            }
            request.page += 1;
        }

        info!(entity = E::NAME, indexed, failed, "Reindex complete");
        Ok(indexed)
    }
}
