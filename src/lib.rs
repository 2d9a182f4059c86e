//! # Querystash - Stored Query Persistence
//!
//! SQLite-backed persistence for user-authored editor queries.
//!
//! Querystash provides:
//! - A storage facade (`QueryStore`) with list/get/store/delete operations
//! - An injectable `ConnectionProvider` seam (file-backed or in-memory)
//! - Opaque JSON documents, validated by the storage engine only
//! - Server-assigned creation timestamps
//! - A CLI for inspecting and managing the stash

pub mod query;
pub mod storage;
pub mod editor;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use query::{QueryId, StoredQuery, StoredQueryMetadata};
pub use storage::{ConnectionProvider, FileProvider, MemoryProvider, QueryStore};
pub use editor::EditorLifecycle;

/// Result type alias for Querystash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Querystash operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A working connection could not be obtained. Never retried here;
    /// retry policy belongs to the provider or the caller.
    #[error("Connection failure: {0}")]
    Connection(String),

    /// A statement failed against the backing store.
    #[error("Store failure: {0}")]
    Store(#[from] rusqlite::Error),

    /// The store rejected the document body (JSON column constraint).
    /// Kept separate from `Store` so callers can tell a data-shape
    /// problem from a transient I/O one.
    #[error("Invalid query document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
