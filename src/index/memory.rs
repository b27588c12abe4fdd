//! In-memory index for tests and the demo CLI.
//!
//! Brute-force matching over items kept in insertion order behind
//! `std::sync::RwLock`. The native control syntax is deliberately small:
//! `*` or `*:*` (or nothing) matches everything, `field:term` matches a
//! token in one field, and a bare `term` matches a token in any field.
//! Relevance is the sum of clause weights over matching fields.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::content::ContentItem;

use super::{IndexProvider, IndexQuery, IndexSearcher, SearchHit, SearchHits, TermKind};

struct IndexedItem {
    id: String,
    fields: BTreeMap<String, String>,
}

/// Brute-force in-memory [`IndexSearcher`].
pub struct MemoryIndex {
    items: RwLock<Vec<IndexedItem>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    /// Index an item's fields, replacing any previous entry with the same id.
    pub fn add(&self, id: impl Into<String>, fields: BTreeMap<String, String>) {
        let id = id.into();
        let mut items = self.items.write().unwrap();
        items.retain(|i| i.id != id);
        items.push(IndexedItem { id, fields });
    }

    /// Index a content item's fields.
    pub fn add_item(&self, item: &ContentItem) {
        self.add(item.id.clone(), item.fields.clone());
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn tokens(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split_whitespace().map(|t| t.to_lowercase())
}

fn field_has_token(value: &str, term: &str) -> bool {
    let term = term.to_lowercase();
    tokens(value).any(|t| t == term)
}

fn field_has_prefix(value: &str, term: &str) -> bool {
    let term = term.to_lowercase();
    tokens(value).any(|t| t.starts_with(&term))
}

fn matches_control(item: &IndexedItem, control: Option<&str>) -> bool {
    let control = match control {
        None => return true,
        Some(c) => c.trim(),
    };
    if control.is_empty() || control == "*" || control == "*:*" {
        return true;
    }
    match control.split_once(':') {
        Some((field, term)) => item
            .fields
            .get(field)
            .is_some_and(|v| field_has_token(v, term)),
        None => item.fields.values().any(|v| field_has_token(v, control)),
    }
}

/// Clause-weight sum over the query's field set. Zero means no phrase match.
fn phrase_score(item: &IndexedItem, query: &IndexQuery) -> f32 {
    let mut score = 0.0;
    for field in &query.fields {
        let Some(value) = item.fields.get(field) else {
            continue;
        };
        for clause in &query.terms {
            match clause.kind {
                TermKind::Boosted(boost) => {
                    if field_has_token(value, &clause.term) {
                        score += boost;
                    }
                }
                TermKind::Wildcard => {
                    if field_has_prefix(value, &clause.term) {
                        score += 1.0;
                    }
                }
            }
        }
    }
    score
}

#[async_trait]
impl IndexSearcher for MemoryIndex {
    async fn fields(&self) -> Result<Vec<String>> {
        let items = self.items.read().unwrap();
        let names: BTreeSet<String> = items
            .iter()
            .flat_map(|i| i.fields.keys().cloned())
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn search(&self, query: &IndexQuery, skip: u64, take: u64) -> Result<SearchHits> {
        let items = self.items.read().unwrap();
        let mut matched: Vec<SearchHit> = Vec::new();
        for item in items.iter() {
            if !matches_control(item, query.control.as_deref()) {
                continue;
            }
            let score = if query.has_phrase() {
                let s = phrase_score(item, query);
                if s <= 0.0 {
                    continue;
                }
                s
            } else {
                0.0
            };
            matched.push(SearchHit {
                id: item.id.clone(),
                score,
            });
        }

        // Native ranking: score descending, insertion order as tie-break
        // (sort is stable).
        matched.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .collect();
        Ok(SearchHits { total, hits })
    }

    async fn count(&self, query: &IndexQuery) -> Result<u64> {
        let items = self.items.read().unwrap();
        let count = items
            .iter()
            .filter(|item| {
                matches_control(item, query.control.as_deref())
                    && (!query.has_phrase() || phrase_score(item, query) > 0.0)
            })
            .count();
        Ok(count as u64)
    }
}

/// [`IndexProvider`] serving named in-memory indexes.
pub struct MemoryIndexProvider {
    indexes: RwLock<HashMap<String, Arc<MemoryIndex>>>,
}

impl MemoryIndexProvider {
    pub fn new() -> Self {
        Self {
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Register an index under a name (builder style).
    pub fn with_index(self, name: impl Into<String>, index: Arc<MemoryIndex>) -> Self {
        self.indexes.write().unwrap().insert(name.into(), index);
        self
    }
}

impl Default for MemoryIndexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexProvider for MemoryIndexProvider {
    async fn searcher(&self, index_name: &str) -> Result<Arc<dyn IndexSearcher>> {
        let indexes = self.indexes.read().unwrap();
        match indexes.get(index_name) {
            Some(index) => Ok(index.clone() as Arc<dyn IndexSearcher>),
            None => bail!("no such index: {index_name}"),
        }
    }
}
