use crate::filter::{FieldPath, IdFilter, RelationFilter, StringFilter};
use crate::model::Tag;

criteria! {
    /// Filters for [`Tag`] queries.
    pub struct TagCriteria for Tag in "tag" {
        id: IdFilter = "id" => FieldPath::column("id"),
        name: StringFilter = "name" => FieldPath::column("name"),
        fragment_id: RelationFilter = "fragmentId" => FieldPath::join("fragment_tag", "tag_id", "id", "fragment_id"),
    }
}
