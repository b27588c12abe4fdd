//! Full-text search backend.
//!
//! A search call resolves the target index and its searchable fields,
//! decides whether to execute at all (a list can stay empty until the
//! visitor supplies a phrase), builds a control filter plus phrase clauses,
//! executes with push-down pagination, and adapts raw hits back into
//! content handles.
//!
//! The searcher handle is opened once per backend instance and reused by
//! `count` and `query`; a `OnceCell` guards concurrent first use.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::OnceCell;

use crate::content::{ContentStore, Listable};
use crate::error::{Error, Result};
use crate::index::{
    IndexProvider, IndexQuery, IndexSearcher, TermClause, TermKind, DEFAULT_INDEX, PHRASE_BOOST,
};
use crate::paging::PagingWindow;
use crate::query::ContentListQuery;

use super::{DataSource, DataSourceMetadata, DataSourceParameter};

pub const SEARCH_SOURCE_KEY: &str = "search";

/// A [`DataSource`] backed by a full-text index.
pub struct SearchDataSource {
    provider: Arc<dyn IndexProvider>,
    content: Arc<dyn ContentStore>,
    /// Instance-level field allow-list, applied when the configuration
    /// carries no `fields` parameter.
    allowed_fields: Option<Vec<String>>,
    searcher: OnceCell<Arc<dyn IndexSearcher>>,
}

impl SearchDataSource {
    pub fn new(provider: Arc<dyn IndexProvider>, content: Arc<dyn ContentStore>) -> Self {
        Self {
            provider,
            content,
            allowed_fields: None,
            searcher: OnceCell::new(),
        }
    }

    /// Restrict phrase matching to these fields unless the configuration
    /// overrides the allow-list itself.
    pub fn with_allowed_fields(mut self, fields: Vec<String>) -> Self {
        self.allowed_fields = Some(fields);
        self
    }

    /// The searcher for the configured index, opened at most once for this
    /// instance's lifetime.
    async fn searcher(&self, query: &ContentListQuery) -> Result<Arc<dyn IndexSearcher>> {
        let index_name = query
            .custom_parameter("index")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_INDEX);

        self.searcher
            .get_or_try_init(|| self.provider.searcher(index_name))
            .await
            .map(Arc::clone)
            .map_err(Error::Backend)
    }

    /// The visitor-supplied search phrase, if a phrase parameter is
    /// configured and carries a non-blank value.
    fn phrase<'a>(query: &'a ContentListQuery) -> Option<&'a str> {
        let key = query.custom_parameter("query_parameter")?;
        query
            .ambient(key)
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
    }

    /// Whether the search should run at all.
    ///
    /// When a phrase parameter is configured but the request carries no
    /// phrase, the list stays empty unless `show_if_no_phrase` opts into
    /// unfiltered results.
    fn should_execute(query: &ContentListQuery) -> bool {
        let no_phrase_key = query
            .custom_parameter("query_parameter")
            .map(str::trim)
            .map_or(true, |key| key.is_empty());
        let has_phrase = Self::phrase(query).is_some();
        let show_if_no_phrase = matches!(
            query.custom_parameter("show_if_no_phrase"),
            Some("1") | Some("true")
        );
        show_if_no_phrase || has_phrase || no_phrase_key
    }

    /// Intersect the index's discovered fields with the configured
    /// allow-list, preserving discovery order. An empty result makes
    /// phrase matching a no-op, not an error.
    fn resolve_fields(&self, query: &ContentListQuery, discovered: Vec<String>) -> Vec<String> {
        let configured: Option<Vec<&str>> = query
            .custom_parameter("fields")
            .map(|raw| {
                raw.split([',', ' '])
                    .filter(|f| !f.is_empty())
                    .collect::<Vec<&str>>()
            })
            .filter(|fields| !fields.is_empty());

        match (&configured, &self.allowed_fields) {
            (Some(allowed), _) => discovered
                .into_iter()
                .filter(|f| allowed.iter().any(|a| a == f))
                .collect(),
            (None, Some(allowed)) => discovered
                .into_iter()
                .filter(|f| allowed.contains(f))
                .collect(),
            (None, None) => discovered,
        }
    }

    /// Build the structured query: control filter AND phrase clauses.
    ///
    /// Each whitespace-separated term yields a boosted exact clause and a
    /// wildcard clause, OR'd with every other clause across the field set.
    fn build_query(&self, query: &ContentListQuery, fields: Vec<String>) -> IndexQuery {
        let control = query
            .custom_parameter("query")
            .map(str::trim)
            .filter(|control| !control.is_empty())
            .map(str::to_string);

        let mut terms = Vec::new();
        if let Some(phrase) = Self::phrase(query) {
            for term in phrase.split_whitespace() {
                terms.push(TermClause {
                    term: term.to_string(),
                    kind: TermKind::Boosted(PHRASE_BOOST),
                });
            }
            for term in phrase.split_whitespace() {
                terms.push(TermClause {
                    term: term.to_string(),
                    kind: TermKind::Wildcard,
                });
            }
        }

        IndexQuery {
            control,
            fields,
            terms,
        }
    }

    /// Resolve the searcher and build the query, or `None` when the search
    /// should not execute for this request.
    async fn prepare(
        &self,
        query: &ContentListQuery,
    ) -> Result<Option<(Arc<dyn IndexSearcher>, IndexQuery)>> {
        if !Self::should_execute(query) {
            return Ok(None);
        }

        let searcher = self.searcher(query).await?;
        let discovered = searcher.fields().await.map_err(Error::Backend)?;
        let fields = self.resolve_fields(query, discovered);
        let index_query = self.build_query(query, fields);
        Ok(Some((searcher, index_query)))
    }
}

#[async_trait]
impl DataSource for SearchDataSource {
    fn metadata(&self) -> DataSourceMetadata {
        DataSourceMetadata {
            key: SEARCH_SOURCE_KEY,
            name: "Search Query",
            parameters: vec![
                DataSourceParameter {
                    key: "query",
                    label: "Query",
                    view: "textarea",
                },
                DataSourceParameter {
                    key: "index",
                    label: "Index name",
                    view: "textbox",
                },
                DataSourceParameter {
                    key: "fields",
                    label: "Searchable fields (comma separated)",
                    view: "textbox",
                },
                DataSourceParameter {
                    key: "query_parameter",
                    label: "Fulltext querystring parameter",
                    view: "textbox",
                },
                DataSourceParameter {
                    key: "show_if_no_phrase",
                    label: "Show results without a phrase",
                    view: "boolean",
                },
            ],
        }
    }

    async fn count(&self, query: &ContentListQuery, pre_skip: u64) -> Result<u64> {
        match self.prepare(query).await? {
            None => Ok(0),
            Some((searcher, index_query)) => {
                let total = searcher.count(&index_query).await.map_err(Error::Backend)?;
                Ok(total.saturating_sub(pre_skip))
            }
        }
    }

    async fn query(
        &self,
        query: &ContentListQuery,
        window: PagingWindow,
    ) -> Result<Vec<Arc<dyn Listable>>> {
        let Some((searcher, index_query)) = self.prepare(query).await? else {
            return Ok(Vec::new());
        };

        let hits = searcher
            .search(&index_query, window.pre_skip + window.skip, window.take)
            .await
            .map_err(Error::Backend)?;

        // Hits whose id no longer resolves are dropped without correcting
        // the count; under a stale index `query` may therefore return fewer
        // items than `count` implies.
        let mut items = Vec::with_capacity(hits.hits.len());
        for hit in hits.hits {
            match self.content.get_by_id(&hit.id).await.map_err(Error::Backend)? {
                Some(item) => items.push(item),
                None => debug!("search source: dropping stale hit {}", hit.id),
            }
        }
        Ok(items)
    }
}
