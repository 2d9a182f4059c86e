//! Terminal rendering for stored query listings

use tabled::{Table, Tabled, settings::Style};

use crate::query::StoredQueryMetadata;

#[derive(Tabled)]
struct MetadataRow {
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Render the metadata listing as a rounded table.
///
/// The listing is the (author, created) projection only; ids are not
/// part of it.
pub fn metadata_table(metadata: &[StoredQueryMetadata]) -> String {
    if metadata.is_empty() {
        return String::new();
    }

    let rows: Vec<MetadataRow> = metadata
        .iter()
        .map(|m| MetadataRow {
            author: m.author.clone(),
            created: m.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}
