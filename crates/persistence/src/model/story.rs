use serde::{Deserialize, Serialize};

use super::validation::min_length;
use super::{Entity, EntityId, StoryCategory, UserRole};
use crate::error::ValidationError;

/// A named, categorized collection of fragments.
///
/// The owned fragments are not part of the story document; they are reached
/// through fragment queries (`storyId`) instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Store-assigned identifier; `None` until saved.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Editorial category.
    pub category: StoryCategory,
    /// Display name.
    pub name: String,
    /// Role required to see the story.
    #[serde(default)]
    pub visibility: Option<UserRole>,
}

impl Story {
    /// Creates an unsaved story.
    pub fn new(category: StoryCategory, name: impl Into<String>) -> Self {
        Self {
            id: None,
            category,
            name: name.into(),
            visibility: None,
        }
    }

    /// Sets the visibility.
    pub fn with_visibility(mut self, visibility: UserRole) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

impl Entity for Story {
    const NAME: &'static str = "Story";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        min_length(Self::NAME, "name", &self.name, 2)
    }
}
