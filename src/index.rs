//! Index-provider collaborator traits and the structured query model.
//!
//! The search data source never talks to a concrete index directly. It
//! builds an [`IndexQuery`] (a native control filter plus phrase clauses
//! over a resolved field set) and hands it to an [`IndexSearcher`]
//! obtained from an [`IndexProvider`]. Each searcher interprets the query
//! with its own native syntax and relevance scoring; this crate never
//! re-ranks results.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Name of the well-known default index searched when a configuration
/// names none.
pub const DEFAULT_INDEX: &str = "external";

/// Relevance weight applied to exact term matches in phrase queries.
pub const PHRASE_BOOST: f32 = 1.5;

/// How one phrase term should match.
#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// Exact match with a relevance boost.
    Boosted(f32),
    /// Wildcard/prefix match at normal weight.
    Wildcard,
}

/// One phrase-matching clause. Clauses are OR'd with each other across the
/// whole field set.
#[derive(Debug, Clone, PartialEq)]
pub struct TermClause {
    pub term: String,
    pub kind: TermKind,
}

/// A structured query against a full-text index.
///
/// Semantics: an item matches when it satisfies the control filter AND, if
/// any term clauses are present, at least one clause on at least one of the
/// listed fields. An empty `fields` set makes the term clauses a no-op
/// (control filter only).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexQuery {
    /// Backend-native filter expression. `None` means match everything.
    pub control: Option<String>,
    /// Fields the term clauses apply to.
    pub fields: Vec<String>,
    /// Phrase clauses, OR'd across the field set.
    pub terms: Vec<TermClause>,
}

impl IndexQuery {
    /// Whether phrase matching participates in this query at all.
    pub fn has_phrase(&self) -> bool {
        !self.terms.is_empty() && !self.fields.is_empty()
    }
}

/// One raw hit from an index.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Content identifier carried by the index.
    pub id: String,
    /// Native relevance score (higher is better).
    pub score: f32,
}

/// A page of hits plus the full match count.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    /// Total matching items, before any skip/take.
    pub total: u64,
    /// Hits for the requested window, in relevance order.
    pub hits: Vec<SearchHit>,
}

/// An opened searcher over one index.
#[async_trait]
pub trait IndexSearcher: Send + Sync {
    /// Names of all indexed fields.
    async fn fields(&self) -> Result<Vec<String>>;

    /// Execute a query with push-down pagination. Implementations must not
    /// materialize the full result set before skipping; cost stays
    /// proportional to `skip + take`, not to the total.
    async fn search(&self, query: &IndexQuery, skip: u64, take: u64) -> Result<SearchHits>;

    /// Count the items matching a query.
    async fn count(&self, query: &IndexQuery) -> Result<u64>;
}

/// Supplies searchers by index name.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// Open (or reuse) a searcher for the named index. Failure here is
    /// fatal for the current render.
    async fn searcher(&self, index_name: &str) -> Result<Arc<dyn IndexSearcher>>;
}
