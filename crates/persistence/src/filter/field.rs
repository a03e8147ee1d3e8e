//! Named field accessors.
//!
//! Every criteria type publishes a static table of [`FieldDef`]s. A field is
//! either a column of the root table or the identifier column of a related
//! table reached through a left outer join.

use super::FieldKind;

/// A left outer join from the root table to a related table.
///
/// Rendered as `LEFT JOIN {table} ON {table}.{foreign_column} = root.{local_column}`,
/// with `target_column` being the compared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    /// The related table.
    pub table: &'static str,
    /// Column of the related table pointing back at the root row.
    pub foreign_column: &'static str,
    /// Column of the root table the join matches on.
    pub local_column: &'static str,
    /// Column of the related table holding the compared identifier.
    pub target_column: &'static str,
}

/// Where a filterable field lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// A column of the root table.
    Column(&'static str),
    /// A column reached through a join.
    Join(Join),
}

impl FieldPath {
    /// A column of the root table.
    pub const fn column(name: &'static str) -> Self {
        FieldPath::Column(name)
    }

    /// A related identifier reached with
    /// `LEFT JOIN table ON table.foreign_column = root.local_column`.
    pub const fn join(
        table: &'static str,
        foreign_column: &'static str,
        local_column: &'static str,
        target_column: &'static str,
    ) -> Self {
        FieldPath::Join(Join {
            table,
            foreign_column,
            local_column,
            target_column,
        })
    }
}

/// A filterable field: its query parameter name, value kind and accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Query parameter name, e.g. `tagId`.
    pub name: &'static str,
    /// Kind of value the field accepts.
    pub kind: FieldKind,
    /// How the store reaches the field.
    pub path: FieldPath,
}

impl FieldDef {
    /// Returns the join this field needs, if any.
    pub fn join(&self) -> Option<&Join> {
        match &self.path {
            FieldPath::Join(join) => Some(join),
            FieldPath::Column(_) => None,
        }
    }
}
