//! Shared fixtures for the persistence integration tests.

#![allow(dead_code)]

use bon_content_persistence::EntityRepository;
use bon_content_persistence::backends::sqlite::{SqliteBackend, SqliteSearchIndex};
use bon_content_persistence::model::{
    EntityId, Fragment, FragmentTemplate, Localized, Story, StoryCategory, Tag,
};

pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

pub fn create_index() -> SqliteSearchIndex {
    let index = SqliteSearchIndex::in_memory().expect("Failed to create search index");
    index.init_schema().expect("Failed to initialize index schema");
    index
}

pub async fn seed_story(backend: &SqliteBackend, name: &str) -> Story {
    backend
        .save(Story::new(StoryCategory::News, name))
        .await
        .expect("Failed to save story")
}

pub async fn seed_tag(backend: &SqliteBackend, name: &str) -> Tag {
    backend.save(Tag::new(name)).await.expect("Failed to save tag")
}

/// An unsaved V1 fragment of `story`.
pub fn fragment(story: &Story, name: &str, order_no: i32) -> Fragment {
    Fragment::new(FragmentTemplate::V1, name, order_no, id_of(story.id))
}

pub async fn seed_fragment(backend: &SqliteBackend, fragment: Fragment) -> Fragment {
    backend.save(fragment).await.expect("Failed to save fragment")
}

pub async fn seed_localized(backend: &SqliteBackend, fragment: &Fragment, i18n: &str) -> Localized {
    backend
        .save(Localized::new(
            i18n,
            format!("{} title", i18n),
            "body",
            id_of(fragment.id),
        ))
        .await
        .expect("Failed to save localized")
}

pub fn id_of(id: Option<EntityId>) -> EntityId {
    id.expect("entity must be saved")
}

/// Raw identifier values, for compact assertions.
pub fn ids<T>(items: &[T], id: impl Fn(&T) -> Option<EntityId>) -> Vec<i64> {
    items
        .iter()
        .filter_map(|item| id(item).map(EntityId::value))
        .collect()
}
