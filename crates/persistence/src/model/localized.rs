use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{matches, max_length, min_length};
use super::{Entity, EntityId, Reference, UserRole};
use crate::error::ValidationError;

static I18N_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-z]+$").unwrap_or_else(|e| panic!("invalid i18n pattern: {e}"))
});

/// A translation of one fragment into a locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localized {
    /// Store-assigned identifier; `None` until saved.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Lower-case locale code, e.g. `sv`.
    pub i18n: String,
    /// Translated title.
    pub title: String,
    /// Translated lead paragraph.
    #[serde(default)]
    pub ingress: Option<String>,
    /// Translated body text.
    pub body: String,
    /// Translated image caption.
    #[serde(default)]
    pub caption: Option<String>,
    /// Role required to see the translation.
    #[serde(default)]
    pub visibility: Option<UserRole>,
    /// The translated fragment.
    pub fragment: Reference,
}

impl Localized {
    /// Creates an unsaved translation of `fragment`.
    pub fn new(
        i18n: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        fragment: EntityId,
    ) -> Self {
        Self {
            id: None,
            i18n: i18n.into(),
            title: title.into(),
            ingress: None,
            body: body.into(),
            caption: None,
            visibility: None,
            fragment: Reference::to(fragment),
        }
    }
}

impl Entity for Localized {
    const NAME: &'static str = "Localized";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        min_length(Self::NAME, "i18n", &self.i18n, 2)?;
        matches(Self::NAME, "i18n", &self.i18n, &I18N_PATTERN)?;
        max_length(Self::NAME, "title", Some(&self.title), 127)?;
        max_length(Self::NAME, "ingress", self.ingress.as_deref(), 255)?;
        max_length(Self::NAME, "caption", self.caption.as_deref(), 255)
    }
}
