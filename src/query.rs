//! Stored query value types.
//!
//! A stored query is an (author, timestamp, opaque JSON document) triple
//! identified by a store-assigned numeric id. The metadata projection
//! (author + creation time) deliberately omits the id; the id only
//! surfaces where a single record is addressed (`get`, `delete`) or
//! created (`store`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned numeric identifier of a stored query (SQLite rowid).
pub type QueryId = i64;

/// The (author, creation time) projection of a stored query.
///
/// Immutable once created: rows are never updated in place, only
/// inserted and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQueryMetadata {
    /// Opaque identifier of the creator; not validated here
    pub author: String,
    /// Server-assigned creation time (never caller-supplied)
    pub created_at: DateTime<Utc>,
}

impl StoredQueryMetadata {
    pub fn new(author: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self { author: author.into(), created_at }
    }
}

/// A full stored query record: metadata plus the document body.
///
/// `data` is a serialized JSON document, stored and returned verbatim.
/// This layer never parses it; well-formedness is enforced by the
/// storage engine's column constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuery {
    pub metadata: StoredQueryMetadata,
    /// Opaque JSON document body
    pub data: String,
}

impl StoredQuery {
    pub fn new(metadata: StoredQueryMetadata, data: impl Into<String>) -> Self {
        Self { metadata, data: data.into() }
    }
}
