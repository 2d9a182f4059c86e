//! SQLite-backed query store implementation

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{ErrorCode, OptionalExtension, Row, params};
use std::path::Path;

use super::provider::{ConnectionProvider, FileProvider, MemoryProvider};
use super::schema;
use crate::query::{QueryId, StoredQuery, StoredQueryMetadata};
use crate::{Error, Result};

/// Persistence facade for stored editor queries.
///
/// Sole mediator between the application and the `stored_editor_queries`
/// table. Each operation acquires one connection from the injected
/// provider, executes a single statement, and releases the connection
/// before returning, on success and on failure alike. No connection is
/// held across operations.
pub struct QueryStore<P: ConnectionProvider> {
    provider: P,
}

impl QueryStore<FileProvider> {
    /// Open a store backed by a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_provider(FileProvider::new(path))
    }
}

impl QueryStore<MemoryProvider> {
    /// Open a store backed by an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::with_provider(MemoryProvider::new()?)
    }
}

impl<P: ConnectionProvider> QueryStore<P> {
    /// Build a store on top of an arbitrary provider and initialize the
    /// schema through one acquired connection.
    pub fn with_provider(provider: P) -> Result<Self> {
        let store = Self { provider };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.provider.acquire()?;
        for stmt in schema::all_schema_statements() {
            conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Query Operations ==========

    /// List the (author, creation time) projection of every stored query.
    ///
    /// Rows come back in insertion order (`ORDER BY id`). That is a
    /// determinism default of this implementation, not a schema
    /// guarantee. A failed read yields an error, never a partial list.
    pub fn list_metadata(&self) -> Result<Vec<StoredQueryMetadata>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare("SELECT author, create_time FROM stored_editor_queries ORDER BY id")?;

        let metadata = stmt
            .query_map([], row_to_metadata)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(metadata)
    }

    /// Get a stored query by id.
    ///
    /// A missing id is a normal outcome and returns `None`; errors are
    /// reserved for connection and statement failures.
    pub fn get(&self, id: QueryId) -> Result<Option<StoredQuery>> {
        let conn = self.provider.acquire()?;
        conn.query_row(
            "SELECT author, create_time, data FROM stored_editor_queries WHERE id = ?1",
            params![id],
            |row| {
                let metadata = row_to_metadata(row)?;
                let data: String = row.get(2)?;
                Ok(StoredQuery::new(metadata, data))
            },
        )
        .optional()
        .map_err(Into::into)
    }

    /// Insert a new stored query and return its assigned id.
    ///
    /// `create_time` is stamped from the server clock at the moment of
    /// the call; callers cannot forge history. `data` must be valid
    /// JSON text - the column constraint rejects anything else and the
    /// table is left unchanged.
    pub fn store(&self, author: &str, data: &str) -> Result<QueryId> {
        let conn = self.provider.acquire()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO stored_editor_queries (author, create_time, data) VALUES (?1, ?2, ?3)",
            params![author, created_at.to_rfc3339(), data],
        )
        .map_err(classify_insert_error)?;

        let id = conn.last_insert_rowid();
        tracing::debug!(author, id, "stored query");
        Ok(id)
    }

    /// Delete the stored query with the given id.
    ///
    /// Deleting an id that does not exist is a no-op, not an error.
    pub fn delete(&self, id: QueryId) -> Result<()> {
        let conn = self.provider.acquire()?;
        let affected =
            conn.execute("DELETE FROM stored_editor_queries WHERE id = ?1", params![id])?;
        tracing::debug!(id, affected, "deleted query");
        Ok(())
    }

    /// Delete every stored query unconditionally. Irreversible;
    /// intended for reset scenarios.
    pub fn delete_all(&self) -> Result<()> {
        let conn = self.provider.acquire()?;
        let affected = conn.execute("DELETE FROM stored_editor_queries", [])?;
        tracing::warn!(affected, "deleted all stored queries");
        Ok(())
    }
}

/// Map the (author, create_time) columns of a row to metadata.
fn row_to_metadata(row: &Row<'_>) -> rusqlite::Result<StoredQueryMetadata> {
    let author: String = row.get(0)?;
    let raw: String = row.get(1)?;
    let created_at = parse_create_time(1, &raw)?;
    Ok(StoredQueryMetadata::new(author, created_at))
}

/// Parse a persisted RFC 3339 timestamp. A value that fails to parse is
/// a store-level fault, reported through rusqlite's conversion error.
fn parse_create_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Split the document-rejected case out of generic statement failures so
/// callers can tell bad data from a transient store problem.
fn classify_insert_error(err: rusqlite::Error) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Error::InvalidDocument(err.to_string())
        }
        _ => Error::Store(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_list_metadata() {
        let store = QueryStore::in_memory().unwrap();
        let before = Utc::now();

        store.store("alice", "{\"q\": 1}").unwrap();

        let metadata = store.list_metadata().unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].author, "alice");
        assert!(metadata[0].created_at >= before);
    }

    #[test]
    fn test_store_then_get_roundtrips_data() {
        let store = QueryStore::in_memory().unwrap();

        let data = "{\"select\":[\"a\",\"b\"],\"limit\":10}";
        let id = store.store("alice", data).unwrap();

        let query = store.get(id).unwrap().unwrap();
        assert_eq!(query.metadata.author, "alice");
        assert_eq!(query.data, data);
    }

    #[test]
    fn test_get_missing_id_is_none() {
        let store = QueryStore::in_memory().unwrap();
        assert!(store.get(9999).unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = QueryStore::in_memory().unwrap();
        let id = store.store("alice", "{}").unwrap();

        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());

        // Second delete of the same id must be a silent no-op.
        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_all_empties_the_table() {
        let store = QueryStore::in_memory().unwrap();
        store.store("alice", "{}").unwrap();
        store.store("bob", "[1,2,3]").unwrap();
        store.store("carol", "\"text\"").unwrap();

        store.delete_all().unwrap();

        assert!(store.list_metadata().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_rejected_without_partial_row() {
        let store = QueryStore::in_memory().unwrap();
        store.store("alice", "{\"ok\":true}").unwrap();

        let err = store.store("mallory", "not valid json").unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));

        // The failed insert must not leave a row behind.
        let metadata = store.list_metadata().unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].author, "alice");
    }

    #[test]
    fn test_listing_follows_insertion_order() {
        let store = QueryStore::in_memory().unwrap();
        store.store("alice", "{}").unwrap();
        store.store("bob", "{}").unwrap();
        store.store("carol", "{}").unwrap();

        let authors: Vec<String> = store
            .list_metadata()
            .unwrap()
            .into_iter()
            .map(|m| m.author)
            .collect();
        assert_eq!(authors, ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_store_lifecycle_scenario() {
        let store = QueryStore::in_memory().unwrap();

        let id = store.store("alice", "{\"q\":1}").unwrap();

        let metadata = store.list_metadata().unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].author, "alice");

        let query = store.get(id).unwrap().unwrap();
        assert_eq!(query.metadata.author, "alice");
        assert_eq!(query.data, "{\"q\":1}");

        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());
        assert!(store.list_metadata().unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("stash.db");

        let id = {
            let store = QueryStore::open(&db_path).unwrap();
            store.store("alice", "{\"saved\":true}").unwrap()
        };

        let store = QueryStore::open(&db_path).unwrap();
        let query = store.get(id).unwrap().unwrap();
        assert_eq!(query.data, "{\"saved\":true}");
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = QueryStore::in_memory().unwrap();
        let first = store.store("alice", "{}").unwrap();
        store.delete(first).unwrap();

        let second = store.store("bob", "{}").unwrap();
        assert_ne!(first, second);
        assert!(store.get(first).unwrap().is_none());
        assert_eq!(store.get(second).unwrap().unwrap().metadata.author, "bob");
    }
}
