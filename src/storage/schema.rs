//! Database schema definitions

/// SQL to create the stored queries table.
///
/// `data` carries the opaque JSON document; the CHECK constraint is the
/// sole JSON validation in the system (the original schema used a
/// `jsonb` column for the same purpose).
pub const CREATE_STORED_QUERIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stored_editor_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    author TEXT NOT NULL,
    create_time TEXT NOT NULL,
    data TEXT NOT NULL CHECK (json_valid(data))
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_STORED_QUERIES_TABLE]
}
