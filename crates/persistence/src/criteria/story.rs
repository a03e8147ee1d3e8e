use crate::filter::{EnumFilter, FieldPath, IdFilter, RelationFilter, StringFilter};
use crate::model::{Story, StoryCategory, UserRole};

criteria! {
    /// Filters for [`Story`] queries.
    pub struct StoryCriteria for Story in "story" {
        id: IdFilter = "id" => FieldPath::column("id"),
        category: EnumFilter<StoryCategory> = "category" => FieldPath::column("category"),
        name: StringFilter = "name" => FieldPath::column("name"),
        visibility: EnumFilter<UserRole> = "visibility" => FieldPath::column("visibility"),
        fragment_id: RelationFilter = "fragmentId" => FieldPath::join("fragment", "story_id", "id", "id"),
    }
}
