//! Connection providers - the injected seam between the store and SQLite.
//!
//! A provider yields one live connection per `acquire` call. The store
//! owns the scope: it acquires at the start of an operation and drops
//! the connection before returning, so no connection outlives a single
//! statement or is shared between concurrent callers.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rusqlite::Connection;

use crate::{Error, Result};

/// Default busy timeout applied to file-backed connections (ms).
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Yields a live database connection per request.
///
/// Failures surface as [`Error::Connection`] and are never retried
/// here; retry policy belongs to the caller.
pub trait ConnectionProvider {
    /// Open a fresh connection to the backing store.
    fn acquire(&self) -> Result<Connection>;
}

/// Provider backed by a database file on disk.
///
/// Opens the file anew on every acquire; dropping the returned
/// connection releases it.
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for FileProvider {
    fn acquire(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(|e| Error::Connection(format!("{}: {}", self.path.display(), e)))?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(conn)
    }
}

/// Provider backed by a named shared-cache in-memory database (for testing).
///
/// A plain in-memory database is private to its connection, which would
/// defeat the connection-per-operation discipline: every operation would
/// see an empty store. A named shared-cache database lets fresh
/// connections observe the same data; the keepalive connection pins the
/// database for the provider's lifetime.
pub struct MemoryProvider {
    uri: String,
    _keepalive: Connection,
}

impl MemoryProvider {
    pub fn new() -> Result<Self> {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        let name = format!("querystash-mem-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed));
        let uri = format!("file:{}?mode=memory&cache=shared", name);
        let keepalive =
            Connection::open(&uri).map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self { uri, _keepalive: keepalive })
    }
}

impl ConnectionProvider for MemoryProvider {
    fn acquire(&self) -> Result<Connection> {
        Connection::open(&self.uri).map_err(|e| Error::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_provider_shares_data_across_acquires() {
        let provider = MemoryProvider::new().unwrap();

        let conn = provider.acquire().unwrap();
        conn.execute("CREATE TABLE t (x INTEGER)", []).unwrap();
        conn.execute("INSERT INTO t VALUES (42)", []).unwrap();
        drop(conn);

        let conn = provider.acquire().unwrap();
        let x: i64 = conn.query_row("SELECT x FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(x, 42);
    }

    #[test]
    fn test_memory_providers_are_isolated_from_each_other() {
        let a = MemoryProvider::new().unwrap();
        let b = MemoryProvider::new().unwrap();

        a.acquire().unwrap().execute("CREATE TABLE t (x INTEGER)", []).unwrap();

        let conn = b.acquire().unwrap();
        let err = conn.query_row("SELECT x FROM t", [], |row| row.get::<_, i64>(0));
        assert!(err.is_err());
    }

    #[test]
    fn test_file_provider_reopens_same_database() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileProvider::new(&dir.path().join("stash.db"));

        let conn = provider.acquire().unwrap();
        conn.execute("CREATE TABLE t (x INTEGER)", []).unwrap();
        conn.execute("INSERT INTO t VALUES (7)", []).unwrap();
        drop(conn);

        let conn = provider.acquire().unwrap();
        let x: i64 = conn.query_row("SELECT x FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn test_file_provider_fails_on_unusable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory is not a database file.
        let provider = FileProvider::new(dir.path());
        match provider.acquire() {
            Err(Error::Connection(_)) => {}
            other => panic!("expected connection failure, got {:?}", other.map(|_| ())),
        }
    }
}
