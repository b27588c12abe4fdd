//! # Content List CLI (`clist`)
//!
//! A small demo frontend for the list engine: load a list configuration
//! and a content fixture, run the query, and print the items plus the
//! pager markup a page would carry.
//!
//! ```bash
//! # Hash key for a configuration
//! clist hash --config list.toml
//!
//! # Render against the in-memory index
//! clist render --config list.toml --content content.json --query-string "q=red car"
//!
//! # Build and query a SQLite FTS index
//! clist index init --db ./data/index.sqlite
//! clist index load --db ./data/index.sqlite --content content.json
//! clist render --config list.toml --content content.json --db ./data/index.sqlite
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use content_list::config::load_config;
use content_list::content::{load_content, InMemoryContentStore};
use content_list::datasource::default_registry;
use content_list::hash::create_hash;
use content_list::index::memory::{MemoryIndex, MemoryIndexProvider};
use content_list::index::sqlite::{connect, SqliteIndex, SqliteIndexProvider};
use content_list::index::{IndexProvider, DEFAULT_INDEX};
use content_list::model::build_model;
use content_list::pager::{render_pager, PagerOptions};
use content_list::query::parse_query_string;

/// Content List demo CLI.
#[derive(Parser)]
#[command(
    name = "clist",
    about = "Paginated, filterable content lists over pluggable data sources",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hash key for a list configuration
    Hash {
        /// Path to a list configuration (TOML)
        #[arg(long)]
        config: PathBuf,
    },
    /// Render a list: items plus pager markup
    Render {
        /// Path to a list configuration (TOML)
        #[arg(long)]
        config: PathBuf,
        /// Path to a content fixture (JSON array of items)
        #[arg(long)]
        content: PathBuf,
        /// Current request query string, e.g. "q=red car"
        #[arg(long, default_value = "")]
        query_string: String,
        /// Use a SQLite index at this path instead of the in-memory index
        #[arg(long)]
        db: Option<PathBuf>,
        /// URL path prefixed to pager links
        #[arg(long)]
        path: Option<String>,
    },
    /// SQLite index maintenance
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Create the index database and schema
    Init {
        #[arg(long)]
        db: PathBuf,
    },
    /// Load a content fixture into the index
    Load {
        #[arg(long)]
        db: PathBuf,
        /// Path to a content fixture (JSON array of items)
        #[arg(long)]
        content: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { config } => {
            let config = load_config(&config)?;
            println!("{}", create_hash(Some(&config)));
        }
        Commands::Render {
            config,
            content,
            query_string,
            db,
            path,
        } => {
            let config = load_config(&config)?;
            let items = load_content(&content)?;

            let provider: Arc<dyn IndexProvider> = match db {
                Some(db) => {
                    let pool = connect(&db).await?;
                    Arc::new(SqliteIndexProvider::new(pool))
                }
                None => {
                    let index = MemoryIndex::new();
                    for item in &items {
                        index.add_item(item);
                    }
                    Arc::new(MemoryIndexProvider::new().with_index(DEFAULT_INDEX, Arc::new(index)))
                }
            };

            let store = Arc::new(InMemoryContentStore::from_items(items));
            let registry = default_registry(store, provider);

            let ambient = parse_query_string(&query_string);
            let model = build_model(&registry, &config, ambient).await?;

            println!(
                "Page {}/{}: items {}-{} of {}",
                model.paging.page,
                model.paging.pages().max(1),
                model.paging.from,
                model.paging.to,
                model.paging.total
            );
            for item in &model.items {
                println!("  {}", item.id());
            }

            let pager = render_pager(
                &model.paging,
                &model.hash,
                model.query.ambient_pairs(),
                &PagerOptions {
                    path,
                    ..Default::default()
                },
            );
            if !pager.is_empty() {
                println!("{pager}");
            }
        }
        Commands::Index { command } => match command {
            IndexCommands::Init { db } => {
                let pool = connect(&db).await?;
                SqliteIndex::new(pool).init().await?;
                println!("Initialized index at {}", db.display());
            }
            IndexCommands::Load { db, content } => {
                let pool = connect(&db).await?;
                let index = SqliteIndex::new(pool);
                index.init().await?;
                let items = load_content(&content)?;
                let n = items.len();
                for item in &items {
                    index.add_item(item).await?;
                }
                println!("Indexed {n} items into {}", db.display());
            }
        },
    }

    Ok(())
}
