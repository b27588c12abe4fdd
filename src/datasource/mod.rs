//! The pluggable data-source contract and its registry.
//!
//! Every backend answers two questions against a [`ContentListQuery`]: how
//! many items match, and which items fall into a given paging window. The
//! [`DataSourceRegistry`] maps a stable string identifier to a factory for
//! each backend, so configuration resolution is an explicit lookup that
//! fails with [`Error::UnknownDataSource`] rather than any kind of runtime
//! type reflection.

pub mod children;
pub mod node;
pub mod search;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::content::{ContentStore, Listable};
use crate::error::{Error, Result};
use crate::index::IndexProvider;
use crate::paging::PagingWindow;
use crate::query::ContentListQuery;

/// One configurable parameter a backend declares, for editor UIs.
///
/// Descriptive only; the engine never consumes this.
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceParameter {
    pub key: &'static str,
    pub label: &'static str,
    /// Input-widget hint (`"textbox"`, `"textarea"`, `"boolean"`).
    pub view: &'static str,
}

/// Static metadata a backend declares about itself.
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceMetadata {
    /// Stable identifier used as the configuration's data-source selector.
    pub key: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Ordered parameter definitions.
    pub parameters: Vec<DataSourceParameter>,
}

/// A pluggable list backend.
///
/// `count` must be side-effect-free and callable independently of `query`.
/// `query` applies `pre_skip`, then `skip`, then limits to `take`, and may
/// return fewer than `take` items only at the true end of the result set.
/// Implementations may cache an internal handle across calls, but
/// concurrent calls against one instance must not corrupt it.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The backend's editor-facing metadata.
    fn metadata(&self) -> DataSourceMetadata;

    /// Total matching items, after subtracting `pre_skip`.
    async fn count(&self, query: &ContentListQuery, pre_skip: u64) -> Result<u64>;

    /// The items for one paging window, in the backend's order.
    async fn query(
        &self,
        query: &ContentListQuery,
        window: PagingWindow,
    ) -> Result<Vec<Arc<dyn Listable>>>;
}

type Factory = Box<dyn Fn() -> Arc<dyn DataSource> + Send + Sync>;

/// Maps stable string identifiers to data-source factories.
pub struct DataSourceRegistry {
    factories: HashMap<String, Factory>,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under a stable identifier. A later registration
    /// under the same identifier replaces the earlier one.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn DataSource> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Box::new(factory));
    }

    /// Produce a backend instance for a configuration's selector.
    pub fn resolve(&self, key: &str) -> Result<Arc<dyn DataSource>> {
        match self.factories.get(key) {
            Some(factory) => Ok(factory()),
            None => Err(Error::UnknownDataSource(key.to_string())),
        }
    }

    /// Metadata for every registered backend, sorted by identifier.
    pub fn sources(&self) -> Vec<DataSourceMetadata> {
        let mut all: Vec<DataSourceMetadata> =
            self.factories.values().map(|f| f().metadata()).collect();
        all.sort_by(|a, b| a.key.cmp(b.key));
        all
    }
}

impl Default for DataSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a registry with the built-in backends wired to the given
/// collaborators.
pub fn default_registry(
    content: Arc<dyn ContentStore>,
    index: Arc<dyn IndexProvider>,
) -> DataSourceRegistry {
    let mut registry = DataSourceRegistry::new();

    let store = content.clone();
    registry.register(node::NODE_SOURCE_KEY, move || {
        Arc::new(node::NodeDataSource::new(store.clone())) as Arc<dyn DataSource>
    });

    let store = content.clone();
    registry.register(children::CHILDREN_SOURCE_KEY, move || {
        Arc::new(children::ChildrenDataSource::new(store.clone())) as Arc<dyn DataSource>
    });

    registry.register(search::SEARCH_SOURCE_KEY, move || {
        Arc::new(search::SearchDataSource::new(index.clone(), content.clone()))
            as Arc<dyn DataSource>
    });

    registry
}

/// Apply a paging window to an already-ordered item sequence.
///
/// Used by backends without native push-down pagination.
pub(crate) fn apply_window(
    items: Vec<Arc<dyn Listable>>,
    window: PagingWindow,
) -> Vec<Arc<dyn Listable>> {
    items
        .into_iter()
        .skip(window.pre_skip as usize)
        .skip(window.skip as usize)
        .take(window.take as usize)
        .collect()
}
