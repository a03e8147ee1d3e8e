use crate::filter::{
    EnumFilter, FieldPath, IdFilter, IntegerFilter, RelationFilter, StringFilter,
};
use crate::model::{Fragment, FragmentTemplate, UserRole};

criteria! {
    /// Filters for [`Fragment`] queries.
    ///
    /// `body` and `image` are not filterable.
    pub struct FragmentCriteria for Fragment in "fragment" {
        id: IdFilter = "id" => FieldPath::column("id"),
        template: EnumFilter<FragmentTemplate> = "template" => FieldPath::column("template"),
        name: StringFilter = "name" => FieldPath::column("name"),
        title: StringFilter = "title" => FieldPath::column("title"),
        ingress: StringFilter = "ingress" => FieldPath::column("ingress"),
        caption: StringFilter = "caption" => FieldPath::column("caption"),
        width: IntegerFilter = "width" => FieldPath::column("width"),
        height: IntegerFilter = "height" => FieldPath::column("height"),
        order_no: IntegerFilter = "orderNo" => FieldPath::column("order_no"),
        visibility: EnumFilter<UserRole> = "visibility" => FieldPath::column("visibility"),
        localized_fragment_id: RelationFilter = "localizedFragmentId"
            => FieldPath::join("localized", "fragment_id", "id", "id"),
        tag_id: RelationFilter = "tagId"
            => FieldPath::join("fragment_tag", "fragment_id", "id", "tag_id"),
        story_id: RelationFilter = "storyId"
            => FieldPath::join("story", "id", "story_id", "id"),
    }
}
