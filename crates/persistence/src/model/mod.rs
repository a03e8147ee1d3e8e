//! Content entity model.
//!
//! Four entities make up the content graph:
//!
//! - [`Story`] - a named, categorized collection of fragments
//! - [`Fragment`] - a block of content belonging to one story, tagged with [`Tag`]s
//! - [`Localized`] - a translated rendition of one fragment
//! - [`Tag`] - a label shared by many fragments
//!
//! Every entity carries an optional [`EntityId`]. The identifier is absent until
//! the store assigns one and never changes afterwards. Equality and hashing are
//! identifier based: two persisted entities are equal when their identifiers
//! match, while an unsaved entity is only equal to itself.

mod enums;
mod fragment;
mod localized;
mod story;
mod tag;
pub(crate) mod validation;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use enums::{FragmentTemplate, NamedEnum, StoryCategory, UnknownVariant, UserRole};
pub use fragment::Fragment;
pub use localized::Localized;
pub use story::Story;
pub use tag::Tag;

/// Store-assigned numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wraps a raw identifier value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A many-to-one link to another entity, serialized as `{"id": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Identifier of the referenced entity.
    pub id: EntityId,
}

impl Reference {
    /// Creates a reference to the entity with the given identifier.
    pub fn to(id: EntityId) -> Self {
        Self { id }
    }
}

/// Common behaviour of every stored entity.
pub trait Entity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular entity name, used in errors and log fields.
    const NAME: &'static str;

    /// Returns the identifier, if the entity has been persisted.
    fn id(&self) -> Option<EntityId>;

    /// Records the identifier assigned by the store on insert.
    fn assign_id(&mut self, id: EntityId);

    /// Checks field constraints.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Implements identifier-based `PartialEq`, `Eq` and `Hash` for entity types.
///
/// Unsaved entities fall back to reference identity and share one hash bucket.
macro_rules! identity_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    match (self.id, other.id) {
                        (Some(a), Some(b)) => a == b,
                        _ => std::ptr::eq(self, other),
                    }
                }
            }

            impl Eq for $ty {}

            impl std::hash::Hash for $ty {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )+
    };
}

identity_eq!(Story, Fragment, Localized, Tag);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_persisted_entities_equal_by_id() {
        let mut a = Tag::new("alpha");
        let mut b = Tag::new("beta");
        a.assign_id(EntityId::new(7));
        b.assign_id(EntityId::new(7));
        assert_eq!(a, b);

        b.assign_id(EntityId::new(8));
        assert_ne!(a, b);
    }

    #[test]
    fn test_unsaved_entity_equal_only_to_itself() {
        let a = Tag::new("alpha");
        let b = a.clone();
        assert_eq!(a, a);
        assert_ne!(a, b);

        let mut saved = Tag::new("alpha");
        saved.assign_id(EntityId::new(1));
        assert_ne!(a, saved);
        assert_ne!(saved, a);
    }

    #[test]
    fn test_hash_follows_identifier() {
        let mut a = Story::new(StoryCategory::News, "first");
        let mut b = Story::new(StoryCategory::Matrilineality, "second");
        a.assign_id(EntityId::new(3));
        b.assign_id(EntityId::new(3));

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_entity_id_parse() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("forty-two".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_reference_json() {
        let reference = Reference::to(EntityId::new(5));
        assert_eq!(serde_json::to_string(&reference).unwrap(), r#"{"id":5}"#);
    }
}
