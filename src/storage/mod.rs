//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - stored_editor_queries(id, author, create_time, data)
//!
//! Every public operation acquires its own connection from a
//! `ConnectionProvider`, executes one statement, and releases the
//! connection before returning.

pub mod provider;
pub mod schema;
pub mod sqlite;

pub use provider::{ConnectionProvider, FileProvider, MemoryProvider};
pub use sqlite::QueryStore;
