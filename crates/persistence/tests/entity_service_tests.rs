//! Entity service integration tests.
//!
//! These tests cover the dual write into the store and the FTS5 index, the
//! handling of a failing index, free-text search and reindexing.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
use bon_content_persistence::core::{EntityRepository, SearchIndex};
use bon_content_persistence::error::{SearchError, StorageError, StorageResult, ValidationError};
use bon_content_persistence::model::{
    Entity, EntityId, Fragment, Localized, Story, StoryCategory, Tag,
};
use bon_content_persistence::service::EntityService;
use bon_content_persistence::types::{Page, PageRequest};

use common::*;

type Service = EntityService<SqliteBackend, SqliteSearchIndex>;

fn create_service() -> Service {
    EntityService::new(Arc::new(create_backend()), Arc::new(create_index()))
}

/// An index that is always down, counting the calls it rejects.
#[derive(Default)]
struct FailingIndex {
    calls: AtomicUsize,
}

impl FailingIndex {
    fn fail<T>(&self) -> StorageResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Search(SearchError::IndexUnavailable {
            message: "connection refused".to_string(),
        }))
    }
}

#[async_trait]
impl<E: Entity> SearchIndex<E> for FailingIndex {
    fn index_name(&self) -> &'static str {
        "failing"
    }

    async fn save(&self, _entity: &E) -> StorageResult<()> {
        self.fail()
    }

    async fn delete_by_id(&self, _id: EntityId) -> StorageResult<()> {
        self.fail()
    }

    async fn clear(&self) -> StorageResult<u64> {
        self.fail()
    }

    async fn search(&self, _query: &str, _page: &PageRequest) -> StorageResult<Page<E>> {
        self.fail()
    }
}

// ============================================================================
// Dual Write
// ============================================================================

#[tokio::test]
async fn test_saved_entity_is_searchable() {
    let service = create_service();

    let story = service
        .create(Story::new(StoryCategory::News, "Harvest festival"))
        .await
        .unwrap();

    let found: Page<Story> = service
        .search("festival", &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(found.content, vec![story]);
    assert_eq!(found.total_elements, 1);
}

#[tokio::test]
async fn test_update_replaces_document() {
    let service = create_service();
    let mut tag = service.create(Tag::new("summer")).await.unwrap();

    tag.name = "winter".to_string();
    service.update(tag.clone()).await.unwrap();

    let old: Page<Tag> = service.search("summer", &PageRequest::default()).await.unwrap();
    assert!(old.content.is_empty());
    let new: Page<Tag> = service.search("winter", &PageRequest::default()).await.unwrap();
    assert_eq!(new.content.len(), 1);
    assert_eq!(new.content[0].name, "winter");
}

#[tokio::test]
async fn test_delete_removes_from_store_and_index() {
    let service = create_service();
    let tag = service.create(Tag::new("ephemeral")).await.unwrap();
    let id = id_of(tag.id);

    service.delete::<Tag>(id).await.unwrap();

    assert!(service.find_one::<Tag>(id).await.unwrap().is_none());
    let found: Page<Tag> = service
        .search("ephemeral", &PageRequest::default())
        .await
        .unwrap();
    assert!(found.content.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_is_not_found() {
    let service = create_service();
    let err = service.delete::<Story>(EntityId::new(3)).await.unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_create_rejects_identifier() {
    let service = create_service();
    let mut tag = Tag::new("tagged");
    tag.id = Some(EntityId::new(1));

    let err = service.create(tag).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::IdentifierPresent { .. })
    ));
}

#[tokio::test]
async fn test_update_requires_identifier() {
    let service = create_service();
    let err = service.update(Tag::new("untagged")).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::IdentifierMissing { .. })
    ));
}

#[tokio::test]
async fn test_invalid_entity_never_reaches_store() {
    let service = create_service();
    let err = service
        .save(Story::new(StoryCategory::News, "x"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::InvalidField { .. })
    ));
    assert_eq!(
        EntityRepository::<Story>::count(&**service.repository()).await.unwrap(),
        0
    );
}

// ============================================================================
// Failing Index
// ============================================================================

#[tokio::test]
async fn test_index_failure_does_not_fail_writes() {
    let index = Arc::new(FailingIndex::default());
    let service = EntityService::new(Arc::new(create_backend()), Arc::clone(&index));

    let tag = service.create(Tag::new("resilient")).await.unwrap();
    let id = id_of(tag.id);
    assert!(service.find_one::<Tag>(id).await.unwrap().is_some());

    service.delete::<Tag>(id).await.unwrap();
    assert!(service.find_one::<Tag>(id).await.unwrap().is_none());

    assert_eq!(index.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_search_degrades_to_empty_page() {
    let service = EntityService::new(Arc::new(create_backend()), Arc::new(FailingIndex::default()));

    let page: Page<Fragment> = service
        .search("anything", &PageRequest::new(0, 5))
        .await
        .unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);
    assert_eq!(page.size, 5);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_prefix_and_match_all() {
    let service = create_service();
    for name in ["gardening", "garage", "kitchen"] {
        service.create(Tag::new(name)).await.unwrap();
    }

    let prefix: Page<Tag> = service.search("gar*", &PageRequest::default()).await.unwrap();
    assert_eq!(prefix.total_elements, 2);

    let all: Page<Tag> = service.search("*", &PageRequest::new(0, 2)).await.unwrap();
    assert_eq!(all.total_elements, 3);
    assert_eq!(all.content.len(), 2);
    assert!(all.has_next());
}

#[tokio::test]
async fn test_search_is_scoped_to_entity_type() {
    let service = create_service();
    let story = service
        .create(Story::new(StoryCategory::News, "Shared words"))
        .await
        .unwrap();
    service.create(Tag::new("shared")).await.unwrap();

    let stories: Page<Story> = service.search("shared", &PageRequest::default()).await.unwrap();
    assert_eq!(stories.content, vec![story]);
}

#[tokio::test]
async fn test_search_finds_fragment_by_tag_name() {
    let service = create_service();
    let story = service
        .create(Story::new(StoryCategory::News, "Story"))
        .await
        .unwrap();
    let tag = service.create(Tag::new("equestrian")).await.unwrap();

    let mut f = fragment(&story, "Riders", 1);
    f.tags = vec![Tag {
        id: tag.id,
        name: String::new(),
    }];
    let saved = service.create(f).await.unwrap();

    let found: Page<Fragment> = service
        .search("equestrian", &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(ids(&found.content, |f| f.id), ids(&[saved], |f| f.id));
}

// ============================================================================
// Reads and Reindex
// ============================================================================

#[tokio::test]
async fn test_find_all_eager_loads_tags() {
    let service = create_service();
    let story = service
        .create(Story::new(StoryCategory::News, "Story"))
        .await
        .unwrap();
    let tag = service.create(Tag::new("loaded")).await.unwrap();
    let mut f = fragment(&story, "f1", 1);
    f.tags = vec![tag];
    service.create(f).await.unwrap();

    let lazy: Page<Fragment> = service.find_all(&PageRequest::default(), false).await.unwrap();
    assert!(lazy.content[0].tags.is_empty());

    let eager: Page<Fragment> = service.find_all(&PageRequest::default(), true).await.unwrap();
    assert_eq!(eager.content[0].tags[0].name, "loaded");
}

#[tokio::test]
async fn test_reindex_repairs_missing_documents() {
    let backend = Arc::new(create_backend());
    for name in ["one", "two", "three"] {
        seed_tag(&backend, name).await;
    }
    let story = seed_story(&backend, "story").await;
    let saved = seed_fragment(&backend, fragment(&story, "f1", 1)).await;
    seed_localized(&backend, &saved, "sv").await;

    let service = EntityService::new(backend, Arc::new(create_index()));
    let before: Page<Tag> = service.search("*", &PageRequest::default()).await.unwrap();
    assert_eq!(before.total_elements, 0);

    assert_eq!(service.reindex::<Tag>(2).await.unwrap(), 3);
    assert_eq!(service.reindex::<Localized>(10).await.unwrap(), 1);

    let after: Page<Tag> = service.search("*", &PageRequest::default()).await.unwrap();
    assert_eq!(after.total_elements, 3);
    let localized: Page<Localized> = service.search("sv", &PageRequest::default()).await.unwrap();
    assert_eq!(localized.total_elements, 1);
}

#[tokio::test]
async fn test_reindex_purges_documents_deleted_from_store() {
    let backend = Arc::new(create_backend());
    let service = EntityService::new(Arc::clone(&backend), Arc::new(create_index()));
    let story = service
        .create(Story::new(StoryCategory::News, "festival"))
        .await
        .unwrap();
    let kept = service
        .create(Story::new(StoryCategory::News, "festival parade"))
        .await
        .unwrap();

    EntityRepository::<Story>::delete_by_id(&*backend, id_of(story.id))
        .await
        .unwrap();
    let stale: Page<Story> = service.search("festival", &PageRequest::default()).await.unwrap();
    assert_eq!(stale.total_elements, 2);

    assert_eq!(service.reindex::<Story>(10).await.unwrap(), 1);

    let after: Page<Story> = service.search("festival", &PageRequest::default()).await.unwrap();
    assert_eq!(ids(&after.content, |s| s.id), vec![id_of(kept.id).value()]);
}

#[tokio::test]
async fn test_reindex_of_empty_store_empties_index() {
    let backend = Arc::new(create_backend());
    let service = EntityService::new(Arc::clone(&backend), Arc::new(create_index()));
    let tag = service.create(Tag::new("orphan")).await.unwrap();
    EntityRepository::<Tag>::delete_by_id(&*backend, id_of(tag.id))
        .await
        .unwrap();

    assert_eq!(service.reindex::<Tag>(10).await.unwrap(), 0);

    let after: Page<Tag> = service.search("orphan", &PageRequest::default()).await.unwrap();
    assert!(after.content.is_empty());
}
