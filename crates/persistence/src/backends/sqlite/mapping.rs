//! Row mapping between content entities and their tables.

use std::collections::HashMap;

use rusqlite::types::Type;
use rusqlite::{Connection, Row, ToSql, params_from_iter};

use crate::model::{
    Entity, EntityId, Fragment, FragmentTemplate, Localized, NamedEnum, Reference, Story,
    StoryCategory, Tag, UserRole,
};

/// Maximum number of identifiers bound in one `IN (...)` list.
const RELATION_CHUNK: usize = 500;

/// Table layout and relation handling of one entity type.
///
/// Column lists never include `id`; it is always the first selected column
/// and is assigned by SQLite on insert.
pub trait SqliteEntity: Entity {
    /// Table name, equal to the criteria root.
    const TABLE: &'static str;

    /// Stored columns other than `id`, in [`to_params`](Self::to_params) order.
    const COLUMNS: &'static [&'static str];

    /// Reads an entity from a row laid out as `id` followed by [`COLUMNS`](Self::COLUMNS).
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Binds the values of [`COLUMNS`](Self::COLUMNS).
    fn to_params(&self) -> Vec<Box<dyn ToSql + '_>>;

    /// Maps a sortable JSON property name to its column.
    fn sort_column(property: &str) -> Option<&'static str>;

    /// Replaces the stored to-many relations owned by the entity.
    fn save_relations(&self, _conn: &Connection, _id: EntityId) -> rusqlite::Result<()> {
        Ok(())
    }

    /// Fills the to-many relations of already loaded entities.
    fn load_relations(_conn: &Connection, _entities: &mut [Self]) -> rusqlite::Result<()> {
        Ok(())
    }

    /// Removes rows that reference the entity and are owned by a relation.
    fn before_delete(_conn: &Connection, _id: EntityId) -> rusqlite::Result<()> {
        Ok(())
    }

    /// All selected columns: `id` followed by [`COLUMNS`](Self::COLUMNS).
    fn select_columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(Self::COLUMNS.len() + 1);
        columns.push("id");
        columns.extend_from_slice(Self::COLUMNS);
        columns
    }
}

fn read_enum<E: NamedEnum>(row: &Row<'_>, idx: usize) -> rusqlite::Result<E> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn read_optional_enum<E: NamedEnum>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<E>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        value
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn read_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<EntityId> {
    row.get::<_, i64>(idx).map(EntityId::new)
}

fn enum_param<E: NamedEnum>(value: Option<E>) -> Option<&'static str> {
    value.map(|v| v.as_str())
}

impl SqliteEntity for Story {
    const TABLE: &'static str = "story";
    const COLUMNS: &'static [&'static str] = &["category", "name", "visibility"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Story {
            id: Some(read_id(row, 0)?),
            category: read_enum::<StoryCategory>(row, 1)?,
            name: row.get(2)?,
            visibility: read_optional_enum::<UserRole>(row, 3)?,
        })
    }

    fn to_params(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![
            Box::new(self.category.as_str()),
            Box::new(&self.name),
            Box::new(enum_param(self.visibility)),
        ]
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "category" => Some("category"),
            "name" => Some("name"),
            "visibility" => Some("visibility"),
            _ => None,
        }
    }
}

impl SqliteEntity for Fragment {
    const TABLE: &'static str = "fragment";
    const COLUMNS: &'static [&'static str] = &[
        "template",
        "name",
        "title",
        "ingress",
        "body",
        "image",
        "image_content_type",
        "caption",
        "width",
        "height",
        "order_no",
        "visibility",
        "story_id",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Fragment {
            id: Some(read_id(row, 0)?),
            template: read_enum::<FragmentTemplate>(row, 1)?,
            name: row.get(2)?,
            title: row.get(3)?,
            ingress: row.get(4)?,
            body: row.get(5)?,
            image: row.get(6)?,
            image_content_type: row.get(7)?,
            caption: row.get(8)?,
            width: row.get(9)?,
            height: row.get(10)?,
            order_no: row.get(11)?,
            visibility: read_optional_enum::<UserRole>(row, 12)?,
            story: Reference::to(read_id(row, 13)?),
            tags: Vec::new(),
        })
    }

    fn to_params(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![
            Box::new(self.template.as_str()),
            Box::new(&self.name),
            Box::new(&self.title),
            Box::new(&self.ingress),
            Box::new(&self.body),
            Box::new(&self.image),
            Box::new(&self.image_content_type),
            Box::new(&self.caption),
            Box::new(self.width),
            Box::new(self.height),
            Box::new(self.order_no),
            Box::new(enum_param(self.visibility)),
            Box::new(self.story.id.value()),
        ]
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "template" => Some("template"),
            "name" => Some("name"),
            "title" => Some("title"),
            "ingress" => Some("ingress"),
            "imageContentType" => Some("image_content_type"),
            "caption" => Some("caption"),
            "width" => Some("width"),
            "height" => Some("height"),
            "orderNo" => Some("order_no"),
            "visibility" => Some("visibility"),
            "story.id" => Some("story_id"),
            _ => None,
        }
    }

    fn save_relations(&self, conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        conn.execute(
            "DELETE FROM fragment_tag WHERE fragment_id = ?1",
            [id.value()],
        )?;
        let mut stmt =
            conn.prepare("INSERT INTO fragment_tag (fragment_id, tag_id) VALUES (?1, ?2)")?;
        for tag_id in self.tag_ids() {
            stmt.execute([id.value(), tag_id.value()])?;
        }
        Ok(())
    }

    fn load_relations(conn: &Connection, entities: &mut [Self]) -> rusqlite::Result<()> {
        let ids: Vec<i64> = entities
            .iter()
            .filter_map(|f| f.id.map(EntityId::value))
            .collect();

        let mut tags_by_fragment: HashMap<i64, Vec<Tag>> = HashMap::new();
        for chunk in ids.chunks(RELATION_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT ft.fragment_id, t.id, t.name FROM fragment_tag ft \
                 JOIN tag t ON t.id = ft.tag_id \
                 WHERE ft.fragment_id IN ({}) ORDER BY t.id",
                placeholders
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Tag {
                        id: Some(read_id(row, 1)?),
                        name: row.get(2)?,
                    },
                ))
            })?;
            for row in rows {
                let (fragment_id, tag) = row?;
                tags_by_fragment.entry(fragment_id).or_default().push(tag);
            }
        }

        for fragment in entities.iter_mut() {
            fragment.tags = fragment
                .id
                .and_then(|id| tags_by_fragment.remove(&id.value()))
                .unwrap_or_default();
        }
        Ok(())
    }

    fn before_delete(conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        conn.execute(
            "DELETE FROM fragment_tag WHERE fragment_id = ?1",
            [id.value()],
        )?;
        Ok(())
    }
}

impl SqliteEntity for Localized {
    const TABLE: &'static str = "localized";
    const COLUMNS: &'static [&'static str] = &[
        "i18n",
        "title",
        "ingress",
        "body",
        "caption",
        "visibility",
        "fragment_id",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Localized {
            id: Some(read_id(row, 0)?),
            i18n: row.get(1)?,
            title: row.get(2)?,
            ingress: row.get(3)?,
            body: row.get(4)?,
            caption: row.get(5)?,
            visibility: read_optional_enum::<UserRole>(row, 6)?,
            fragment: Reference::to(read_id(row, 7)?),
        })
    }

    fn to_params(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![
            Box::new(&self.i18n),
            Box::new(&self.title),
            Box::new(&self.ingress),
            Box::new(&self.body),
            Box::new(&self.caption),
            Box::new(enum_param(self.visibility)),
            Box::new(self.fragment.id.value()),
        ]
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "i18n" => Some("i18n"),
            "title" => Some("title"),
            "ingress" => Some("ingress"),
            "caption" => Some("caption"),
            "visibility" => Some("visibility"),
            "fragment.id" => Some("fragment_id"),
            _ => None,
        }
    }
}

impl SqliteEntity for Tag {
    const TABLE: &'static str = "tag";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tag {
            id: Some(read_id(row, 0)?),
            name: row.get(1)?,
        })
    }

    fn to_params(&self) -> Vec<Box<dyn ToSql + '_>> {
        vec![Box::new(&self.name)]
    }

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "name" => Some("name"),
            _ => None,
        }
    }

    fn before_delete(conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        conn.execute("DELETE FROM fragment_tag WHERE tag_id = ?1", [id.value()])?;
        Ok(())
    }
}
