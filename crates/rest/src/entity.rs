//! Entities exposed over HTTP.
//!
//! [`ExposedEntity`] binds an entity to its URL segment, its alert name and
//! its criteria type, so every route can be written once and instantiated
//! per entity.

use bon_content_persistence::criteria::{
    Criteria, FragmentCriteria, LocalizedCriteria, StoryCriteria, TagCriteria,
};
use bon_content_persistence::model::{Entity, Fragment, Localized, Story, Tag};

/// An entity with a REST resource.
pub trait ExposedEntity: Entity {
    /// Plural path segment, e.g. `stories` in `/api/stories`.
    const PLURAL: &'static str;

    /// Entity name used in alert headers, e.g. `bonContentServiceStory`.
    const ALERT_NAME: &'static str;

    /// Criteria bound from the query string of list and count requests.
    type Criteria: Criteria<Entity = Self>;
}

impl ExposedEntity for Story {
    const PLURAL: &'static str = "stories";
    const ALERT_NAME: &'static str = "bonContentServiceStory";
    type Criteria = StoryCriteria;
}

impl ExposedEntity for Fragment {
    const PLURAL: &'static str = "fragments";
    const ALERT_NAME: &'static str = "bonContentServiceFragment";
    type Criteria = FragmentCriteria;
}

impl ExposedEntity for Localized {
    const PLURAL: &'static str = "localizeds";
    const ALERT_NAME: &'static str = "bonContentServiceLocalized";
    type Criteria = LocalizedCriteria;
}

impl ExposedEntity for Tag {
    const PLURAL: &'static str = "tags";
    const ALERT_NAME: &'static str = "bonContentServiceTag";
    type Criteria = TagCriteria;
}
