use crate::filter::{EnumFilter, FieldPath, IdFilter, RelationFilter, StringFilter};
use crate::model::{Localized, UserRole};

criteria! {
    /// Filters for [`Localized`] queries.
    pub struct LocalizedCriteria for Localized in "localized" {
        id: IdFilter = "id" => FieldPath::column("id"),
        i18n: StringFilter = "i18n" => FieldPath::column("i18n"),
        title: StringFilter = "title" => FieldPath::column("title"),
        ingress: StringFilter = "ingress" => FieldPath::column("ingress"),
        caption: StringFilter = "caption" => FieldPath::column("caption"),
        visibility: EnumFilter<UserRole> = "visibility" => FieldPath::column("visibility"),
        fragment_id: RelationFilter = "fragmentId" => FieldPath::join("fragment", "id", "fragment_id", "id"),
    }
}
