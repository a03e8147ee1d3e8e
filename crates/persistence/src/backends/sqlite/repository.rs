//! EntityRepository and SpecificationExecutor implementations for SQLite.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, ToSql, TransactionBehavior, ffi, params_from_iter};
use tracing::debug;

use crate::core::{EntityRepository, SpecificationExecutor};
use crate::error::{ConstraintError, ConstraintKind, StorageError, StorageResult, ValidationError};
use crate::filter::Specification;
use crate::model::EntityId;
use crate::types::{Direction, Page, PageRequest, SortOrder};

use super::SqliteBackend;
use super::backend::{internal_error, run_blocking};
use super::mapping::SqliteEntity;
use super::query_builder::{QueryBuilder, SqlFragment};

/// Maps a failed write, turning SQLite constraint failures into
/// [`ConstraintError`]s.
fn write_error<E: SqliteEntity>(err: rusqlite::Error, action: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(code, message) = &err {
        let kind = match code.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                Some(ConstraintKind::Unique)
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
            _ => None,
        };
        if let Some(kind) = kind {
            return StorageError::Constraint(ConstraintError {
                entity: E::NAME.to_string(),
                kind,
                message: message.clone().unwrap_or_else(|| err.to_string()),
            });
        }
    }
    internal_error(format!("Failed to {} {}: {}", action, E::NAME, err))
}

fn read_error<E: SqliteEntity>(err: rusqlite::Error) -> StorageError {
    internal_error(format!("Failed to read {}: {}", E::NAME, err))
}

/// Resolves sort directives to columns, rejecting unknown properties.
fn resolve_sort<E: SqliteEntity>(
    sort: &[SortOrder],
) -> StorageResult<Vec<(&'static str, Direction)>> {
    sort.iter()
        .map(|order| {
            E::sort_column(&order.property)
                .map(|column| (column, order.direction))
                .ok_or_else(|| {
                    StorageError::Validation(ValidationError::InvalidSort {
                        entity: E::NAME.to_string(),
                        property: order.property.clone(),
                    })
                })
        })
        .collect()
}

fn check_root<E: SqliteEntity>(spec: &Specification) -> StorageResult<()> {
    if spec.root() != E::TABLE {
        return Err(internal_error(format!(
            "specification rooted at '{}' cannot be executed against {}",
            spec.root(),
            E::TABLE
        )));
    }
    Ok(())
}

fn query_entities<E: SqliteEntity>(conn: &Connection, query: &SqlFragment) -> StorageResult<Vec<E>> {
    let mut stmt = conn.prepare(&query.sql).map_err(read_error::<E>)?;
    let rows = stmt
        .query_map(params_from_iter(query.params.iter()), |row| E::from_row(row))
        .map_err(read_error::<E>)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(read_error::<E>)
}

fn query_count<E: SqliteEntity>(conn: &Connection, query: &SqlFragment) -> StorageResult<u64> {
    let count: i64 = conn
        .query_row(&query.sql, params_from_iter(query.params.iter()), |row| row.get(0))
        .map_err(read_error::<E>)?;
    Ok(u64::try_from(count).unwrap_or_default())
}

impl SqliteBackend {
    fn find_page<E: SqliteEntity>(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> StorageResult<Page<E>> {
        check_root::<E>(spec)?;
        let order = resolve_sort::<E>(&page.sort)?;
        let builder = QueryBuilder::new(spec);
        let count_query = builder.count();
        let select_query = builder.select(
            &E::select_columns(),
            &order,
            Some((u64::from(page.size), page.offset())),
        );

        let mut conn = self.get_connection()?;
        // Count and page read the same snapshot.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(read_error::<E>)?;
        let total = query_count::<E>(&tx, &count_query)?;
        let content = if total == 0 {
            Vec::new()
        } else {
            query_entities::<E>(&tx, &select_query)?
        };
        tx.commit().map_err(read_error::<E>)?;

        Ok(Page::new(content, page, total))
    }

    fn save_blocking<E: SqliteEntity>(&self, entity: E) -> StorageResult<E> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| write_error::<E>(e, "save"))?;

        let values = entity.to_params();
        let id = match entity.id() {
            None => {
                let placeholders = (1..=E::COLUMNS.len())
                    .map(|i| format!("?{}", i))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    E::TABLE,
                    E::COLUMNS.join(", "),
                    placeholders
                );
                tx.execute(&sql, params_from_iter(values.iter()))
                    .map_err(|e| write_error::<E>(e, "insert"))?;
                EntityId::new(tx.last_insert_rowid())
            }
            Some(id) => {
                let assignments = E::COLUMNS
                    .iter()
                    .enumerate()
                    .map(|(i, column)| format!("{} = ?{}", column, i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "UPDATE {} SET {} WHERE id = ?{}",
                    E::TABLE,
                    assignments,
                    E::COLUMNS.len() + 1
                );
                let id_value = id.value();
                let mut bound: Vec<&dyn ToSql> =
                    values.iter().map(|v| v.as_ref() as &dyn ToSql).collect();
                bound.push(&id_value);
                let changed = tx
                    .execute(&sql, params_from_iter(bound.iter()))
                    .map_err(|e| write_error::<E>(e, "update"))?;
                if changed == 0 {
                    return Err(StorageError::not_found(E::NAME, id));
                }
                id
            }
        };
        drop(values);

        entity
            .save_relations(&tx, id)
            .map_err(|e| write_error::<E>(e, "save relations of"))?;

        let mut saved = entity;
        saved.assign_id(id);
        E::load_relations(&tx, std::slice::from_mut(&mut saved)).map_err(read_error::<E>)?;

        tx.commit().map_err(|e| write_error::<E>(e, "commit"))?;
        debug!(entity = E::NAME, %id, "Saved entity");
        Ok(saved)
    }

    fn find_one_blocking<E: SqliteEntity>(
        &self,
        id: EntityId,
        with_relations: bool,
    ) -> StorageResult<Option<E>> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(read_error::<E>)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            E::select_columns().join(", "),
            E::TABLE
        );
        let mut found = tx
            .query_row(&sql, [id.value()], |row| E::from_row(row))
            .optional()
            .map_err(read_error::<E>)?;
        if with_relations {
            if let Some(entity) = found.as_mut() {
                E::load_relations(&tx, std::slice::from_mut(entity)).map_err(read_error::<E>)?;
            }
        }
        tx.commit().map_err(read_error::<E>)?;
        Ok(found)
    }

    fn delete_blocking<E: SqliteEntity>(&self, id: EntityId) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction()
            .map_err(|e| write_error::<E>(e, "delete"))?;

        E::before_delete(&tx, id).map_err(|e| write_error::<E>(e, "detach"))?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
        let changed = tx
            .execute(&sql, [id.value()])
            .map_err(|e| write_error::<E>(e, "delete"))?;
        if changed == 0 {
            return Err(StorageError::not_found(E::NAME, id));
        }

        tx.commit().map_err(|e| write_error::<E>(e, "commit"))?;
        debug!(entity = E::NAME, %id, "Deleted entity");
        Ok(())
    }
}

#[async_trait]
impl<E: SqliteEntity> EntityRepository<E> for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn save(&self, entity: E) -> StorageResult<E> {
        let backend = self.clone();
        run_blocking(move || backend.save_blocking(entity)).await
    }

    async fn find_by_id(&self, id: EntityId) -> StorageResult<Option<E>> {
        let backend = self.clone();
        run_blocking(move || backend.find_one_blocking(id, false)).await
    }

    async fn find_one_with_relations(&self, id: EntityId) -> StorageResult<Option<E>> {
        let backend = self.clone();
        run_blocking(move || backend.find_one_blocking(id, true)).await
    }

    async fn find_all(&self, page: &PageRequest) -> StorageResult<Page<E>> {
        let backend = self.clone();
        let page = page.clone();
        run_blocking(move || backend.find_page::<E>(&Specification::all(E::TABLE), &page)).await
    }

    async fn load_relations(&self, entities: &mut [E]) -> StorageResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let backend = self.clone();
        let mut owned = entities.to_vec();
        let loaded = run_blocking(move || {
            let conn = backend.get_connection()?;
            E::load_relations(&conn, &mut owned).map_err(read_error::<E>)?;
            Ok(owned)
        })
        .await?;
        entities.clone_from_slice(&loaded);
        Ok(())
    }

    async fn delete_by_id(&self, id: EntityId) -> StorageResult<()> {
        let backend = self.clone();
        run_blocking(move || backend.delete_blocking::<E>(id)).await
    }

    async fn count(&self) -> StorageResult<u64> {
        let backend = self.clone();
        run_blocking(move || {
            let conn = backend.get_connection()?;
            let query = QueryBuilder::new(&Specification::all(E::TABLE)).count();
            query_count::<E>(&conn, &query)
        })
        .await
    }
}

#[async_trait]
impl<E: SqliteEntity> SpecificationExecutor<E> for SqliteBackend {
    async fn find_all_matching(&self, spec: &Specification) -> StorageResult<Vec<E>> {
        check_root::<E>(spec)?;
        let query = QueryBuilder::new(spec).select(&E::select_columns(), &[], None);
        let backend = self.clone();
        run_blocking(move || {
            let conn = backend.get_connection()?;
            query_entities::<E>(&conn, &query)
        })
        .await
    }

    async fn find_page_matching(
        &self,
        spec: &Specification,
        page: &PageRequest,
    ) -> StorageResult<Page<E>> {
        let backend = self.clone();
        let spec = spec.clone();
        let page = page.clone();
        run_blocking(move || backend.find_page::<E>(&spec, &page)).await
    }

    async fn count_matching(&self, spec: &Specification) -> StorageResult<u64> {
        check_root::<E>(spec)?;
        let query = QueryBuilder::new(spec).count();
        let backend = self.clone();
        run_blocking(move || {
            let conn = backend.get_connection()?;
            query_count::<E>(&conn, &query)
        })
        .await
    }
}
