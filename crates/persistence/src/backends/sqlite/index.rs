//! FTS5 full-text search index.
//!
//! Every indexed entity is stored as one row of the `documents_fts` virtual
//! table: the serialized JSON document plus a `content` column holding every
//! string value of the document, tokenized with `porter unicode61`.
//!
//! The index lives in its own database so that it can lag behind, or be
//! rebuilt independently of, the primary store.
//!
//! # Query syntax
//!
//! Whitespace separated terms, all of which must match. A term ending in `*`
//! is a prefix match. An empty query or a lone `*` matches every document.
//! Any other FTS5 syntax in the input is matched literally.

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde_json::Value;
use tracing::debug;

use crate::core::SearchIndex;
use crate::error::{
    BackendError, SearchError, StorageError, StorageResult, ValidationError,
};
use crate::model::{Entity, EntityId};
use crate::types::{Page, PageRequest};

use super::backend::{SqliteBackendConfig, build_pool, is_memory_path, run_blocking};

/// The name of the FTS5 virtual table.
const FTS_TABLE_NAME: &str = "documents_fts";

/// Keys whose values are never worth matching against.
const SKIPPED_KEYS: &[&str] = &["id", "image", "imageContentType"];

/// Search index backed by an SQLite FTS5 table.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Clone)]
pub struct SqliteSearchIndex {
    pool: Pool<SqliteConnectionManager>,
    is_memory: bool,
}

impl Debug for SqliteSearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSearchIndex")
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

impl SqliteSearchIndex {
    /// Creates a new in-memory index.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(":memory:", SqliteBackendConfig::default())
    }

    /// Opens or creates a file-based index.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteBackendConfig::default())
    }

    /// Creates an index with custom pool configuration.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let pool = build_pool(path.as_ref(), &config, "sqlite-fts5")?;
        Ok(Self {
            pool,
            is_memory: is_memory_path(path.as_ref()),
        })
    }

    /// Creates the FTS5 table if it does not exist.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(&format!(
            "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5(
                entity_type UNINDEXED,
                entity_id UNINDEXED,
                document UNINDEXED,
                content,
                tokenize='porter unicode61'
            )",
            FTS_TABLE_NAME
        ))
        .map_err(|e| {
            StorageError::Backend(BackendError::MigrationError {
                message: format!("Failed to create {}: {}", FTS_TABLE_NAME, e),
            })
        })
    }

    /// Returns whether this is an in-memory index.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    fn get_connection(&self) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StorageError::Search(SearchError::IndexUnavailable {
                message: e.to_string(),
            })
        })
    }
}

fn unavailable(err: rusqlite::Error) -> StorageError {
    let message = err.to_string();
    if message.contains("fts5: syntax error") {
        StorageError::Search(SearchError::QueryParseError { message })
    } else {
        StorageError::Search(SearchError::IndexUnavailable { message })
    }
}

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

/// Extracts all string values from a JSON value recursively.
///
/// Concatenates all string values found in the document, separated by spaces.
pub(crate) fn extract_all_strings(value: &Value) -> String {
    let mut strings = Vec::new();
    extract_strings_recursive(value, &mut strings);
    strings.join(" ")
}

fn extract_strings_recursive(value: &Value, strings: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => strings.push(s.clone()),
        Value::Array(arr) => {
            for item in arr {
                extract_strings_recursive(item, strings);
            }
        }
        Value::Object(obj) => {
            for (key, val) in obj {
                if !SKIPPED_KEYS.contains(&key.as_str()) {
                    extract_strings_recursive(val, strings);
                }
            }
        }
        _ => {}
    }
}

/// Translates a user query into an FTS5 MATCH expression.
///
/// Returns `None` when the query matches every document.
pub(crate) fn build_match_expression(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .filter_map(|term| {
            let (body, prefix) = match term.strip_suffix('*') {
                Some(body) => (body.trim_end_matches('*'), true),
                None => (term, false),
            };
            if body.is_empty() {
                return None;
            }
            let quoted = format!("\"{}\"", body.replace('"', "\"\""));
            Some(if prefix { format!("{}*", quoted) } else { quoted })
        })
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl SqliteSearchIndex {
    fn write_document(
        &self,
        entity_type: &str,
        id: EntityId,
        document: &str,
        content: &str,
    ) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction().map_err(unavailable)?;
        tx.execute(
            "DELETE FROM documents_fts WHERE entity_type = ?1 AND entity_id = ?2",
            params![entity_type, id.value()],
        )
        .map_err(unavailable)?;
        tx.execute(
            "INSERT INTO documents_fts (entity_type, entity_id, document, content)
             VALUES (?1, ?2, ?3, ?4)",
            params![entity_type, id.value(), document, content],
        )
        .map_err(unavailable)?;
        tx.commit().map_err(unavailable)
    }

    fn remove_document(&self, entity_type: &str, id: EntityId) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.execute(
            "DELETE FROM documents_fts WHERE entity_type = ?1 AND entity_id = ?2",
            params![entity_type, id.value()],
        )
        .map_err(unavailable)?;
        Ok(())
    }

    fn remove_all_documents(&self, entity_type: &str) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let removed = conn
            .execute(
                "DELETE FROM documents_fts WHERE entity_type = ?1",
                params![entity_type],
            )
            .map_err(unavailable)?;
        Ok(u64::try_from(removed).unwrap_or_default())
    }

    /// Returns the total match count and one page of raw documents.
    fn query_documents(
        &self,
        entity_type: &str,
        expression: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(i64, Vec<String>)> {
        let conn = self.get_connection()?;

        match expression {
            None => {
                let total = conn
                    .query_row(
                        "SELECT COUNT(*) FROM documents_fts WHERE entity_type = ?1",
                        params![entity_type],
                        |row| row.get(0),
                    )
                    .map_err(unavailable)?;
                let mut stmt = conn
                    .prepare(
                        "SELECT document FROM documents_fts WHERE entity_type = ?1
                         ORDER BY CAST(entity_id AS INTEGER) LIMIT ?2 OFFSET ?3",
                    )
                    .map_err(unavailable)?;
                let documents = stmt
                    .query_map(params![entity_type, limit, offset], |row| row.get(0))
                    .map_err(unavailable)?
                    .collect::<Result<Vec<String>, _>>()
                    .map_err(unavailable)?;
                Ok((total, documents))
            }
            Some(expression) => {
                let total = conn
                    .query_row(
                        "SELECT COUNT(*) FROM documents_fts
                         WHERE documents_fts MATCH ?2 AND entity_type = ?1",
                        params![entity_type, expression],
                        |row| row.get(0),
                    )
                    .map_err(unavailable)?;
                let mut stmt = conn
                    .prepare(
                        "SELECT document FROM documents_fts
                         WHERE documents_fts MATCH ?2 AND entity_type = ?1
                         ORDER BY rank LIMIT ?3 OFFSET ?4",
                    )
                    .map_err(unavailable)?;
                let documents = stmt
                    .query_map(params![entity_type, expression, limit, offset], |row| {
                        row.get(0)
                    })
                    .map_err(unavailable)?
                    .collect::<Result<Vec<String>, _>>()
                    .map_err(unavailable)?;
                Ok((total, documents))
            }
        }
    }
}

#[async_trait]
impl<E: Entity> SearchIndex<E> for SqliteSearchIndex {
    fn index_name(&self) -> &'static str {
        "sqlite-fts5"
    }

    async fn save(&self, entity: &E) -> StorageResult<()> {
        let id = entity.id().ok_or_else(|| {
            StorageError::Validation(ValidationError::IdentifierMissing {
                entity: E::NAME.to_string(),
            })
        })?;

        let json = serde_json::to_value(entity)
            .map_err(|e| serialization_error(format!("Failed to serialize {}: {}", E::NAME, e)))?;
        let document = json.to_string();
        let content = extract_all_strings(&json);

        let index = self.clone();
        run_blocking(move || index.write_document(E::NAME, id, &document, &content)).await?;

        debug!(entity = E::NAME, %id, "Indexed document");
        Ok(())
    }

    async fn delete_by_id(&self, id: EntityId) -> StorageResult<()> {
        let index = self.clone();
        run_blocking(move || index.remove_document(E::NAME, id)).await
    }

    async fn clear(&self) -> StorageResult<u64> {
        let index = self.clone();
        let removed = run_blocking(move || index.remove_all_documents(E::NAME)).await?;
        debug!(entity = E::NAME, removed, "Cleared documents");
        Ok(removed)
    }

    async fn search(&self, query: &str, page: &PageRequest) -> StorageResult<Page<E>> {
        let limit = i64::from(page.size);
        let offset = clamp_i64(page.offset());
        let expression = build_match_expression(query);

        let index = self.clone();
        let (total, documents) = run_blocking(move || {
            index.query_documents(E::NAME, expression.as_deref(), limit, offset)
        })
        .await?;

        let content = documents
            .iter()
            .map(|document| {
                serde_json::from_str::<E>(document).map_err(|e| {
                    serialization_error(format!("Failed to deserialize {}: {}", E::NAME, e))
                })
            })
            .collect::<StorageResult<Vec<E>>>()?;

        Ok(Page::new(
            content,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_expression() {
        assert_eq!(build_match_expression(""), None);
        assert_eq!(build_match_expression("  * "), None);
        assert_eq!(
            build_match_expression("news story"),
            Some("\"news\" \"story\"".to_string())
        );
        assert_eq!(
            build_match_expression("intro*"),
            Some("\"intro\"*".to_string())
        );
        assert_eq!(
            build_match_expression("a\"b OR"),
            Some("\"a\"\"b\" \"OR\"".to_string())
        );
    }

    #[test]
    fn test_extract_all_strings_skips_technical_keys() {
        let doc = json!({
            "id": 4,
            "name": "intro",
            "image": "aGVsbG8=",
            "tags": [{"id": 1, "name": "sports"}],
            "width": 3
        });
        let content = extract_all_strings(&doc);
        assert!(content.contains("intro"));
        assert!(content.contains("sports"));
        assert!(!content.contains("aGVsbG8="));
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let index = SqliteSearchIndex::in_memory().unwrap();
        index.init_schema().unwrap();
        index.init_schema().unwrap();
        assert!(index.is_memory());
    }

    #[test]
    fn test_remove_all_documents_is_scoped_to_entity_type() {
        let index = SqliteSearchIndex::in_memory().unwrap();
        index.init_schema().unwrap();
        index
            .write_document("tag", EntityId::new(1), "{}", "alpha")
            .unwrap();
        index
            .write_document("tag", EntityId::new(2), "{}", "beta")
            .unwrap();
        index
            .write_document("story", EntityId::new(1), "{}", "alpha")
            .unwrap();

        assert_eq!(index.remove_all_documents("tag").unwrap(), 2);

        let (tags, _) = index.query_documents("tag", None, 10, 0).unwrap();
        let (stories, _) = index.query_documents("story", None, 10, 0).unwrap();
        assert_eq!(tags, 0);
        assert_eq!(stories, 1);
    }
}
