//! SQLite backend integration tests.
//!
//! These tests verify the SQLite store against the repository traits:
//! identifier assignment, constraints, relation handling and paging.

mod common;

use bon_content_persistence::EntityRepository;
use bon_content_persistence::backends::sqlite::SqliteBackend;
use bon_content_persistence::error::{
    ConstraintError, ConstraintKind, StorageError, ValidationError,
};
use bon_content_persistence::model::{
    EntityId, Fragment, Localized, Story, StoryCategory, Tag, UserRole,
};
use bon_content_persistence::types::{PageRequest, SortOrder};

use common::*;

// ============================================================================
// Create and Read Tests
// ============================================================================

#[tokio::test]
async fn test_create_assigns_identifier() {
    let backend = create_backend();

    let story = Story::new(StoryCategory::Matrilineality, "Mothers").with_visibility(UserRole::User);
    let saved = backend.save(story).await.unwrap();

    let id = saved.id.expect("identifier assigned");
    let found: Story = backend.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.name, "Mothers");
    assert_eq!(found.category, StoryCategory::Matrilineality);
    assert_eq!(found.visibility, Some(UserRole::User));
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_find_missing_returns_none() {
    let backend = create_backend();
    let found: Option<Tag> = backend.find_by_id(EntityId::new(99)).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_fragment_round_trips_every_column() {
    let backend = create_backend();
    let story = seed_story(&backend, "story").await;

    let mut fragment = fragment(&story, "intro", 3);
    fragment.title = Some("Title".to_string());
    fragment.ingress = Some("Ingress".to_string());
    fragment.body = Some("Long body".to_string());
    fragment.image = Some(vec![0, 1, 2, 254, 255]);
    fragment.image_content_type = Some("image/png".to_string());
    fragment.caption = Some("Caption".to_string());
    fragment.width = Some(640);
    fragment.height = Some(480);
    fragment.visibility = Some(UserRole::Admin);

    let saved = seed_fragment(&backend, fragment.clone()).await;
    let found: Fragment = backend
        .find_one_with_relations(id_of(saved.id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.image, fragment.image);
    assert_eq!(found.width, Some(640));
    assert_eq!(found.order_no, 3);
    assert_eq!(found.story.id, id_of(story.id));
    assert_eq!(found.visibility, Some(UserRole::Admin));
    assert_eq!(found.body.as_deref(), Some("Long body"));
}

// ============================================================================
// Update and Delete Tests
// ============================================================================

#[tokio::test]
async fn test_update_existing() {
    let backend = create_backend();
    let mut story = seed_story(&backend, "before").await;

    story.name = "after".to_string();
    let updated = backend.save(story.clone()).await.unwrap();
    assert_eq!(updated.id, story.id);

    let found: Story = backend.find_by_id(id_of(story.id)).await.unwrap().unwrap();
    assert_eq!(found.name, "after");
    assert_eq!(EntityRepository::<Story>::count(&backend).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let backend = create_backend();
    let mut tag = Tag::new("ghost");
    tag.id = Some(EntityId::new(42));

    let err = backend.save(tag).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let backend = create_backend();
    let err = EntityRepository::<Localized>::delete_by_id(&backend, EntityId::new(7))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_removes_row() {
    let backend = create_backend();
    let tag = seed_tag(&backend, "news").await;

    EntityRepository::<Tag>::delete_by_id(&backend, id_of(tag.id))
        .await
        .unwrap();
    let found: Option<Tag> = backend.find_by_id(id_of(tag.id)).await.unwrap();
    assert!(found.is_none());
}

// ============================================================================
// Constraint Tests
// ============================================================================

#[tokio::test]
async fn test_story_name_is_unique() {
    let backend = create_backend();
    seed_story(&backend, "same").await;

    let err = backend
        .save(Story::new(StoryCategory::News, "same"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Constraint(ConstraintError {
            kind: ConstraintKind::Unique,
            ..
        })
    ));
}

#[tokio::test]
async fn test_fragment_requires_existing_story() {
    let backend = create_backend();
    let orphan = Fragment::new(
        bon_content_persistence::model::FragmentTemplate::V2,
        "orphan",
        1,
        EntityId::new(123),
    );

    let err = backend.save(orphan).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Constraint(ConstraintError {
            kind: ConstraintKind::ForeignKey,
            ..
        })
    ));
}

#[tokio::test]
async fn test_story_with_fragments_cannot_be_deleted() {
    let backend = create_backend();
    let story = seed_story(&backend, "parent").await;
    seed_fragment(&backend, fragment(&story, "child", 1)).await;

    let err = EntityRepository::<Story>::delete_by_id(&backend, id_of(story.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));

    // The failed delete left the story in place.
    let found: Option<Story> = backend.find_by_id(id_of(story.id)).await.unwrap();
    assert!(found.is_some());
}

// ============================================================================
// Relation Tests
// ============================================================================

#[tokio::test]
async fn test_fragment_tags_are_written_as_a_whole() {
    let backend = create_backend();
    let story = seed_story(&backend, "tagged").await;
    let sports = seed_tag(&backend, "sports").await;
    let culture = seed_tag(&backend, "culture").await;
    let local = seed_tag(&backend, "local").await;

    let mut fragment = fragment(&story, "f", 1);
    fragment.tags = vec![sports.clone(), culture.clone()];
    let mut saved = seed_fragment(&backend, fragment).await;
    assert_eq!(ids(&saved.tags, |t| t.id), ids(&[sports.clone(), culture.clone()], |t| t.id));

    // Tags referenced only by id come back with their names.
    saved.tags = vec![Tag {
        id: local.id,
        name: String::new(),
    }];
    let updated = backend.save(saved).await.unwrap();
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].name, "local");

    let found: Fragment = backend
        .find_one_with_relations(id_of(updated.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ids(&found.tags, |t| t.id), vec![id_of(local.id).value()]);
}

#[tokio::test]
async fn test_fragment_with_unknown_tag_is_rejected() {
    let backend = create_backend();
    let story = seed_story(&backend, "s").await;
    let mut fragment = fragment(&story, "f", 1);
    fragment.tags = vec![Tag {
        id: Some(EntityId::new(500)),
        name: String::new(),
    }];

    let err = backend.save(fragment).await.unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));
    assert_eq!(EntityRepository::<Fragment>::count(&backend).await.unwrap(), 0);
}

#[tokio::test]
async fn test_find_by_id_skips_relations() {
    let backend = create_backend();
    let story = seed_story(&backend, "s").await;
    let tag = seed_tag(&backend, "t1").await;
    let mut fragment = fragment(&story, "f", 1);
    fragment.tags = vec![tag];
    let saved = seed_fragment(&backend, fragment).await;

    let mut plain: Vec<Fragment> = vec![backend.find_by_id(id_of(saved.id)).await.unwrap().unwrap()];
    assert!(plain[0].tags.is_empty());

    backend.load_relations(&mut plain[..]).await.unwrap();
    assert_eq!(plain[0].tags.len(), 1);
}

#[tokio::test]
async fn test_deleting_tag_detaches_it() {
    let backend = create_backend();
    let story = seed_story(&backend, "s").await;
    let keep = seed_tag(&backend, "keep").await;
    let dropped = seed_tag(&backend, "drop").await;
    let mut fragment = fragment(&story, "f", 1);
    fragment.tags = vec![keep.clone(), dropped.clone()];
    let saved = seed_fragment(&backend, fragment).await;

    EntityRepository::<Tag>::delete_by_id(&backend, id_of(dropped.id))
        .await
        .unwrap();

    let found: Fragment = backend
        .find_one_with_relations(id_of(saved.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ids(&found.tags, |t| t.id), vec![id_of(keep.id).value()]);
}

#[tokio::test]
async fn test_deleting_fragment_detaches_tags() {
    let backend = create_backend();
    let story = seed_story(&backend, "s").await;
    let tag = seed_tag(&backend, "t1").await;
    let mut fragment = fragment(&story, "f", 1);
    fragment.tags = vec![tag.clone()];
    let saved = seed_fragment(&backend, fragment).await;

    EntityRepository::<Fragment>::delete_by_id(&backend, id_of(saved.id))
        .await
        .unwrap();
    // Nothing references the tag any more.
    EntityRepository::<Tag>::delete_by_id(&backend, id_of(tag.id))
        .await
        .unwrap();
    EntityRepository::<Story>::delete_by_id(&backend, id_of(story.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_localized_belongs_to_fragment() {
    let backend = create_backend();
    let story = seed_story(&backend, "s").await;
    let saved_fragment = seed_fragment(&backend, fragment(&story, "f", 1)).await;
    let localized = seed_localized(&backend, &saved_fragment, "sv").await;

    assert_eq!(localized.fragment.id, id_of(saved_fragment.id));
    let err = EntityRepository::<Fragment>::delete_by_id(&backend, id_of(saved_fragment.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));
}

// ============================================================================
// Paging Tests
// ============================================================================

#[tokio::test]
async fn test_find_all_pages_in_id_order() {
    let backend = create_backend();
    for name in ["aa", "bb", "cc", "dd", "ee"] {
        seed_tag(&backend, name).await;
    }

    let first = EntityRepository::<Tag>::find_all(&backend, &PageRequest::new(0, 2))
        .await
        .unwrap();
    assert_eq!(first.total_elements, 5);
    assert_eq!(first.total_pages(), 3);
    assert_eq!(
        first.content.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["aa", "bb"]
    );

    let last = EntityRepository::<Tag>::find_all(&backend, &PageRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(last.content.len(), 1);
    assert!(!last.has_next());
}

#[tokio::test]
async fn test_find_all_sorted() {
    let backend = create_backend();
    for name in ["bb", "aa", "cc"] {
        seed_tag(&backend, name).await;
    }

    let request = PageRequest::new(0, 10).with_sort(SortOrder::desc("name"));
    let page = EntityRepository::<Tag>::find_all(&backend, &request)
        .await
        .unwrap();
    assert_eq!(
        page.content.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["cc", "bb", "aa"]
    );
}

#[tokio::test]
async fn test_unknown_sort_property_is_rejected() {
    let backend = create_backend();
    let request = PageRequest::new(0, 10).with_sort(SortOrder::asc("body"));
    let err = EntityRepository::<Fragment>::find_all(&backend, &request)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::InvalidSort { .. })
    ));
}

// ============================================================================
// File Backend Tests
// ============================================================================

#[tokio::test]
async fn test_file_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend.init_schema().unwrap();
        seed_story(&backend, "durable").await;
    }

    let backend = SqliteBackend::open(&path).unwrap();
    backend.init_schema().unwrap();
    let page = EntityRepository::<Story>::find_all(&backend, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].name, "durable");
}
