//! Content handles and the content-lookup collaborator.
//!
//! The engine never interprets an item's fields; a [`Listable`] only has to
//! be identifiable, and orderable by whichever backend produced it. The
//! [`ContentStore`] trait is the black-box collaborator that adapts raw ids
//! (from a search index or a configuration) back into content handles.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An opaque handle to a content item returned by a data source.
pub trait Listable: Send + Sync {
    /// Stable identifier of the item.
    fn id(&self) -> &str;

    /// Backend-defined ordering key among siblings.
    fn sort_order(&self) -> i64 {
        0
    }

    /// A named field value, if the item carries one.
    fn field(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Lookup of content items by id, plus child listing for hierarchical
/// backends.
///
/// Implementations must be `Send + Sync`; all operations are read-only.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Retrieve an item by id. `None` means the id no longer resolves.
    async fn get_by_id(&self, id: &str) -> Result<Option<Arc<dyn Listable>>>;

    /// List the children of a node in sibling order.
    async fn children(&self, parent_id: &str) -> Result<Vec<Arc<dyn Listable>>>;
}

/// A concrete content item, deserializable from fixture files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Listable for ContentItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.as_str())
    }
}

/// In-memory [`ContentStore`] for tests and the demo CLI.
///
/// Uses a `HashMap` behind `std::sync::RwLock` for thread safety.
pub struct InMemoryContentStore {
    items: RwLock<HashMap<String, Arc<ContentItem>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_items(items: Vec<ContentItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.insert(item);
        }
        store
    }

    pub fn insert(&self, item: ContentItem) {
        self.items
            .write()
            .unwrap()
            .insert(item.id.clone(), Arc::new(item));
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Arc<dyn Listable>>> {
        let items = self.items.read().unwrap();
        Ok(items.get(id).map(|i| i.clone() as Arc<dyn Listable>))
    }

    async fn children(&self, parent_id: &str) -> Result<Vec<Arc<dyn Listable>>> {
        let items = self.items.read().unwrap();
        let mut children: Vec<Arc<ContentItem>> = items
            .values()
            .filter(|i| i.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
        Ok(children
            .into_iter()
            .map(|i| i as Arc<dyn Listable>)
            .collect())
    }
}

/// Load content items from a JSON fixture file (an array of items).
pub fn load_content(path: &Path) -> Result<Vec<ContentItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content file: {}", path.display()))?;
    let items: Vec<ContentItem> =
        serde_json::from_str(&content).with_context(|| "Failed to parse content file")?;
    Ok(items)
}
