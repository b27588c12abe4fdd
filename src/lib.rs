//! # Content List
//!
//! Paginated, filterable lists of content items over pluggable data
//! sources: direct node lookup, child-node listing, and full-text search.
//!
//! The engine is deliberately small: a deterministic configuration hash
//! lets several independently configured lists coexist on one page without
//! query-string collisions, a two-operation data-source contract unifies
//! "fetch a page" and "count total" across heterogeneous backends, and the
//! search backend turns a visitor phrase into boosted-exact plus wildcard
//! clauses over the index's resolved field set. Rendering of the items
//! themselves is left to the caller; the pager markup is produced here
//! because its link rewriting is part of the paging contract.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | List configuration: selector, parameters, paging settings |
//! | [`hash`] | Deterministic configuration hash keys |
//! | [`paging`] | Page windows and display ranges |
//! | [`query`] | Per-request query context |
//! | [`datasource`] | The pluggable backend contract, registry, and built-ins |
//! | [`index`] | Index collaborator traits, in-memory and SQLite FTS5 indexes |
//! | [`content`] | Content handles and the content-lookup collaborator |
//! | [`pager`] | Pager link and markup construction |
//! | [`model`] | Render-model orchestration |
//! | [`error`] | Error types |
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use content_list::config::ListConfig;
//! use content_list::content::InMemoryContentStore;
//! use content_list::datasource::default_registry;
//! use content_list::index::memory::MemoryIndexProvider;
//! use content_list::model::build_model;
//! use content_list::pager::{render_pager, PagerOptions};
//! use content_list::query::parse_query_string;
//!
//! # async fn run() -> content_list::error::Result<()> {
//! let registry = default_registry(
//!     Arc::new(InMemoryContentStore::new()),
//!     Arc::new(MemoryIndexProvider::new()),
//! );
//!
//! let config = ListConfig::for_source("search")
//!     .with_parameter("query_parameter", "q")
//!     .with_page_size(10);
//!
//! let ambient = parse_query_string("q=red car");
//! let model = build_model(&registry, &config, ambient).await?;
//! let pager = render_pager(
//!     &model.paging,
//!     &model.hash,
//!     model.query.ambient_pairs(),
//!     &PagerOptions::default(),
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod datasource;
pub mod error;
pub mod hash;
pub mod index;
pub mod model;
pub mod pager;
pub mod paging;
pub mod query;
