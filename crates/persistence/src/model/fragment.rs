use serde::{Deserialize, Serialize};

use super::validation::{max_length, min_length};
use super::{Entity, EntityId, FragmentTemplate, Reference, Tag, UserRole};
use crate::error::ValidationError;

/// A block of content within a story.
///
/// `tags` is populated when the fragment is loaded with its relations. On
/// save only the tag identifiers are read; the tag rows themselves are not
/// touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Store-assigned identifier; `None` until saved.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Layout template.
    pub template: FragmentTemplate,
    /// Internal name.
    pub name: String,
    /// Title shown to readers.
    #[serde(default)]
    pub title: Option<String>,
    /// Lead paragraph.
    #[serde(default)]
    pub ingress: Option<String>,
    /// Body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Image bytes, base64 in JSON.
    #[serde(default, with = "image_base64")]
    pub image: Option<Vec<u8>>,
    /// MIME type of `image`.
    #[serde(default)]
    pub image_content_type: Option<String>,
    /// Image caption.
    #[serde(default)]
    pub caption: Option<String>,
    /// Layout width.
    #[serde(default)]
    pub width: Option<i32>,
    /// Layout height.
    #[serde(default)]
    pub height: Option<i32>,
    /// Position within the story.
    pub order_no: i32,
    /// Role required to see the fragment.
    #[serde(default)]
    pub visibility: Option<UserRole>,
    /// The owning story.
    pub story: Reference,
    /// Tags attached to the fragment.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Fragment {
    /// Creates an unsaved fragment belonging to `story`.
    pub fn new(
        template: FragmentTemplate,
        name: impl Into<String>,
        order_no: i32,
        story: EntityId,
    ) -> Self {
        Self {
            id: None,
            template,
            name: name.into(),
            title: None,
            ingress: None,
            body: None,
            image: None,
            image_content_type: None,
            caption: None,
            width: None,
            height: None,
            order_no,
            visibility: None,
            story: Reference::to(story),
            tags: Vec::new(),
        }
    }

    /// Identifiers of the attached tags that have been persisted.
    pub fn tag_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.tags.iter().filter_map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Entity for Fragment {
    const NAME: &'static str = "Fragment";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        min_length(Self::NAME, "name", &self.name, 2)?;
        max_length(Self::NAME, "title", self.title.as_deref(), 127)?;
        max_length(Self::NAME, "ingress", self.ingress.as_deref(), 255)?;
        max_length(Self::NAME, "caption", self.caption.as_deref(), 255)?;
        if self.tags.iter().any(|t| t.id.is_none()) {
            return Err(ValidationError::InvalidField {
                entity: Self::NAME.to_string(),
                field: "tags".to_string(),
                message: "tags must be saved before they are attached".to_string(),
            });
        }
        Ok(())
    }
}

/// Serializes the image blob as standard base64.
mod image_base64 {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_shape() {
        let mut fragment = Fragment::new(FragmentTemplate::V1, "intro", 1, EntityId::new(4));
        fragment.image = Some(vec![0, 1, 2]);
        fragment.image_content_type = Some("image/png".to_string());

        let value = serde_json::to_value(&fragment).unwrap();
        assert_eq!(value["template"], "V1");
        assert_eq!(value["orderNo"], 1);
        assert_eq!(value["story"], json!({"id": 4}));
        assert_eq!(value["image"], "AAEC");
        assert_eq!(value["imageContentType"], "image/png");
        assert_eq!(value["tags"], json!([]));
    }

    #[test]
    fn test_deserialize_with_tag_references() {
        let fragment: Fragment = serde_json::from_value(json!({
            "template": "V2",
            "name": "body",
            "orderNo": 3,
            "story": {"id": 1},
            "tags": [{"id": 9}, {"id": 2}, {"id": 9}]
        }))
        .unwrap();
        assert_eq!(fragment.id, None);
        assert_eq!(fragment.tag_ids(), vec![EntityId::new(2), EntityId::new(9)]);
        assert!(fragment.validate().is_ok());
    }

    #[test]
    fn test_validate_lengths() {
        let mut fragment = Fragment::new(FragmentTemplate::V1, "x", 1, EntityId::new(1));
        assert!(fragment.validate().is_err());

        fragment.name = "xy".to_string();
        fragment.caption = Some("c".repeat(256));
        let err = fragment.validate().unwrap_err();
        assert!(err.to_string().contains("caption"));
    }

    #[test]
    fn test_validate_rejects_unsaved_tags() {
        let mut fragment = Fragment::new(FragmentTemplate::V1, "tagged", 1, EntityId::new(1));
        fragment.tags.push(Tag::new("fresh"));
        assert!(fragment.validate().is_err());
    }
}
