use serde::{Deserialize, Serialize};

use super::validation::min_length;
use super::{Entity, EntityId};
use crate::error::ValidationError;

/// A label shared by many fragments.
///
/// `name` defaults to empty so a fragment document may reference tags as
/// `{"id": n}`; saving a tag still requires a real name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Store-assigned identifier; `None` until saved.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Tag label.
    #[serde(default)]
    pub name: String,
}

impl Tag {
    /// Creates an unsaved tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity for Tag {
    const NAME: &'static str = "Tag";

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
