//! Querystash CLI - Command-line interface for the stored query stash

use clap::{Parser, Subcommand};
use querystash::storage::QueryStore;
use querystash::{config, ui};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "querystash")]
#[command(version = "0.1.0")]
#[command(about = "SQLite-backed stash for user-authored editor queries")]
#[command(long_about = r#"
Querystash persists user-authored queries as opaque JSON documents,
enabling:
  • Metadata listing (author + creation time)
  • Retrieval and deletion by store-assigned id
  • Server-assigned timestamps (no forged history)

Example usage:
  querystash store --author alice --file query.json
  querystash list
  querystash show --id 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a querystash.toml config file
    Init {
        /// Database path to record in the config
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// List metadata of all stored queries
    List {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show a single stored query by id
    Show {
        /// Store-assigned query id
        #[arg(short, long)]
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Store a new query document
    Store {
        /// Author identifier recorded with the query
        #[arg(short, long)]
        author: String,

        /// File containing the JSON document (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Delete a stored query by id
    Delete {
        /// Store-assigned query id
        #[arg(short, long)]
        id: i64,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Delete every stored query (irreversible)
    Clear {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn open_store(database: Option<PathBuf>) -> anyhow::Result<QueryStore<querystash::FileProvider>> {
    let db_path = config::resolve_database_path(database, None)?;
    config::ensure_db_dir(&db_path)?;
    Ok(QueryStore::open(&db_path)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { database, force } => {
            let config_path = config::default_config_path();
            let database = database
                .unwrap_or_else(|| config::default_database_path_in(std::path::Path::new(".")));
            let config = config::QuerystashConfig {
                database: Some(database.to_string_lossy().to_string()),
            };
            config::write_config(&config_path, &config, force)?;
            println!("✅ Wrote config to {:?}", config_path);
            println!("🗄️  Database: {:?}", database);
        }

        Commands::List { database } => {
            let store = open_store(database)?;
            let metadata = store.list_metadata()?;

            if metadata.is_empty() {
                println!("∅ No stored queries.");
            } else {
                println!("{}", ui::metadata_table(&metadata));
                println!("📊 {} stored quer{}", metadata.len(), if metadata.len() == 1 { "y" } else { "ies" });
            }
        }

        Commands::Show { id, database, format } => {
            let store = open_store(database)?;

            match store.get(id)? {
                Some(query) => {
                    if format == "json" {
                        println!("{}", serde_json::to_string_pretty(&query)?);
                    } else {
                        println!("👤 Author:  {}", query.metadata.author);
                        println!("🕒 Created: {}", query.metadata.created_at.to_rfc3339());
                        println!("📄 Data:");
                        println!("{}", query.data);
                    }
                }
                None => {
                    println!("❌ No stored query with id {}.", id);
                }
            }
        }

        Commands::Store { author, file, database } => {
            let data = match file {
                Some(path) => std::fs::read_to_string(&path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let store = open_store(database)?;
            let id = store.store(&author, data.trim_end())?;
            println!("✅ Stored query #{} for author '{}'", id, author);
        }

        Commands::Delete { id, database } => {
            let store = open_store(database)?;
            store.delete(id)?;
            println!("🗑️  Deleted query #{} (no-op if it did not exist)", id);
        }

        Commands::Clear { database } => {
            let store = open_store(database)?;
            store.delete_all()?;
            println!("🗑️  Deleted all stored queries.");
        }
    }

    Ok(())
}
