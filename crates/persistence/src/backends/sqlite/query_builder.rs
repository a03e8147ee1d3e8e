//! SQL query builder for criteria specifications.
//!
//! Translates a [`Specification`] into SQL that can be executed against the
//! content tables. The root table is always aliased `r`; each condition on a
//! relation field gets its own `LEFT JOIN` aliased `j_<field>_<n>`, `n` being
//! the position of the condition, so `tagId.greaterThan=1&tagId.lessThan=5`
//! matches a fragment with some tag above 1 and some tag below 5.
//!
//! When a specification joins a to-many relation the same root row can appear
//! once per related row, so matching rows are selected through an
//! `r.id IN (...)` subquery and counted with `COUNT(DISTINCT r.id)`.

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use crate::filter::{Condition, FieldPath, Predicate, ScalarValue, Specification};
use crate::types::Direction;

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::String(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
        }
    }
}

impl From<&ScalarValue> for SqlParam {
    fn from(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Integer(i) => SqlParam::Integer(*i),
            ScalarValue::Text(s) => SqlParam::String(s.clone()),
        }
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter and returns its placeholder.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Returns true if this fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Builds SELECT and COUNT statements for one specification.
pub struct QueryBuilder<'a> {
    spec: &'a Specification,
}

impl<'a> QueryBuilder<'a> {
    /// Creates a builder for `spec`, rooted at the table named by `spec.root()`.
    pub fn new(spec: &'a Specification) -> Self {
        Self { spec }
    }

    /// Builds a SELECT of `columns` in the given order, optionally limited.
    ///
    /// `order` lists already validated column names. The identifier is
    /// appended as a final tie-breaker so paging is stable.
    pub fn select(
        &self,
        columns: &[&str],
        order: &[(&str, Direction)],
        limit: Option<(u64, u64)>,
    ) -> SqlFragment {
        let root = self.spec.root();
        let column_list = columns
            .iter()
            .map(|c| format!("r.{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut fragment = SqlFragment::new(String::new());
        let filter = self.write_conditions(&mut fragment);

        let mut sql = format!("SELECT {} FROM {} r", column_list, root);
        if let Some(filter) = filter {
            if self.has_joins() {
                sql.push_str(&format!(
                    " WHERE r.id IN (SELECT r.id FROM {} WHERE {})",
                    self.from_clause(),
                    filter
                ));
            } else {
                sql.push_str(&format!(" WHERE {}", filter));
            }
        }

        sql.push_str(" ORDER BY ");
        let mut terms: Vec<String> = order
            .iter()
            .map(|(column, direction)| format!("r.{} {}", column, direction.as_sql()))
            .collect();
        if !order.iter().any(|(column, _)| *column == "id") {
            terms.push("r.id ASC".to_string());
        }
        sql.push_str(&terms.join(", "));

        if let Some((limit, offset)) = limit {
            let limit_ph = fragment.add_param(SqlParam::Integer(clamp_i64(limit)));
            let offset_ph = fragment.add_param(SqlParam::Integer(clamp_i64(offset)));
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit_ph, offset_ph));
        }

        fragment.sql = sql;
        fragment
    }

    /// Builds a COUNT of distinct matching root rows.
    pub fn count(&self) -> SqlFragment {
        let mut fragment = SqlFragment::new(String::new());
        let filter = self.write_conditions(&mut fragment);

        let mut sql = if self.has_joins() {
            format!("SELECT COUNT(DISTINCT r.id) FROM {}", self.from_clause())
        } else {
            format!("SELECT COUNT(*) FROM {} r", self.spec.root())
        };
        if let Some(filter) = filter {
            sql.push_str(&format!(" WHERE {}", filter));
        }

        fragment.sql = sql;
        fragment
    }

    fn has_joins(&self) -> bool {
        !self.spec.joins().is_empty()
    }

    /// The root table followed by one LEFT JOIN per joined field.
    fn from_clause(&self) -> String {
        let mut from = format!("{} r", self.spec.root());
        for (position, field, join) in self.spec.joins() {
            let alias = join_alias(field.name, position);
            from.push_str(&format!(
                " LEFT JOIN {table} {alias} ON {alias}.{foreign} = r.{local}",
                table = join.table,
                alias = alias,
                foreign = join.foreign_column,
                local = join.local_column,
            ));
        }
        from
    }

    /// Renders the conjunction of all conditions, binding values into
    /// `fragment`. Returns `None` for an unrestricted specification.
    fn write_conditions(&self, fragment: &mut SqlFragment) -> Option<String> {
        if self.spec.is_unrestricted() {
            return None;
        }
        let clauses: Vec<String> = self
            .spec
            .conditions()
            .iter()
            .enumerate()
            .map(|(position, condition)| render_condition(condition, position, fragment))
            .collect();
        Some(
            clauses
                .iter()
                .map(|c| format!("({})", c))
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    }
}

fn join_alias(field_name: &str, position: usize) -> String {
    format!("j_{}_{}", field_name, position)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn column_expr(condition: &Condition, position: usize) -> String {
    match &condition.field.path {
        FieldPath::Column(column) => format!("r.{}", column),
        FieldPath::Join(join) => format!(
            "{}.{}",
            join_alias(condition.field.name, position),
            join.target_column
        ),
    }
}

fn render_condition(condition: &Condition, position: usize, fragment: &mut SqlFragment) -> String {
    let column = column_expr(condition, position);
    match &condition.predicate {
        Predicate::Equals(value) => {
            format!("{} = {}", column, fragment.add_param(value.into()))
        }
        Predicate::NotEquals(value) => {
            format!("{} <> {}", column, fragment.add_param(value.into()))
        }
        Predicate::Specified(true) => format!("{} IS NOT NULL", column),
        Predicate::Specified(false) => format!("{} IS NULL", column),
        Predicate::GreaterThan(value) => {
            format!("{} > {}", column, fragment.add_param(value.into()))
        }
        Predicate::GreaterThanOrEqual(value) => {
            format!("{} >= {}", column, fragment.add_param(value.into()))
        }
        Predicate::LessThan(value) => {
            format!("{} < {}", column, fragment.add_param(value.into()))
        }
        Predicate::LessThanOrEqual(value) => {
            format!("{} <= {}", column, fragment.add_param(value.into()))
        }
        // An empty list matches nothing.
        Predicate::In(values) if values.is_empty() => "1 = 0".to_string(),
        Predicate::In(values) => {
            format!("{} IN ({})", column, placeholders(values, fragment))
        }
        // An empty exclusion list excludes nothing.
        Predicate::NotIn(values) if values.is_empty() => "1 = 1".to_string(),
        Predicate::NotIn(values) => {
            format!("{} NOT IN ({})", column, placeholders(values, fragment))
        }
        Predicate::Contains(needle) => format!(
            "instr({}, {}) > 0",
            column,
            fragment.add_param(SqlParam::String(needle.clone()))
        ),
        Predicate::DoesNotContain(needle) => format!(
            "instr({}, {}) = 0",
            column,
            fragment.add_param(SqlParam::String(needle.clone()))
        ),
    }
}

fn placeholders(values: &[ScalarValue], fragment: &mut SqlFragment) -> String {
    values
        .iter()
        .map(|value| fragment.add_param(value.into()))
        .collect::<Vec<_>>()
        .join(", ")
}
