//! Direct node-lookup backend: lists explicitly configured content ids.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::content::{ContentStore, Listable};
use crate::error::Result;
use crate::paging::PagingWindow;
use crate::query::ContentListQuery;

use super::{apply_window, DataSource, DataSourceMetadata, DataSourceParameter};

pub const NODE_SOURCE_KEY: &str = "node";

/// Lists the content items named by the `nodes` parameter, in listed order.
/// Ids that no longer resolve are dropped, like stale search hits.
pub struct NodeDataSource {
    content: Arc<dyn ContentStore>,
}

impl NodeDataSource {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    fn configured_ids(query: &ContentListQuery) -> Vec<String> {
        query
            .custom_parameter("nodes")
            .unwrap_or_default()
            .split([',', ' '])
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .collect()
    }

    async fn resolve_all(&self, query: &ContentListQuery) -> Result<Vec<Arc<dyn Listable>>> {
        let mut items = Vec::new();
        for id in Self::configured_ids(query) {
            match self.content.get_by_id(&id).await? {
                Some(item) => items.push(item),
                None => debug!("node source: dropping unresolved id {id}"),
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl DataSource for NodeDataSource {
    fn metadata(&self) -> DataSourceMetadata {
        DataSourceMetadata {
            key: NODE_SOURCE_KEY,
            name: "Content Nodes",
            parameters: vec![DataSourceParameter {
                key: "nodes",
                label: "Node ids (comma separated)",
                view: "textbox",
            }],
        }
    }

    async fn count(&self, query: &ContentListQuery, pre_skip: u64) -> Result<u64> {
        let total = self.resolve_all(query).await?.len() as u64;
        Ok(total.saturating_sub(pre_skip))
    }

    async fn query(
        &self,
        query: &ContentListQuery,
        window: PagingWindow,
    ) -> Result<Vec<Arc<dyn Listable>>> {
        Ok(apply_window(self.resolve_all(query).await?, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListConfig;
    use crate::content::{ContentItem, InMemoryContentStore};
    use std::collections::BTreeMap;

    fn store() -> Arc<InMemoryContentStore> {
        let items = ["a", "b", "c", "d"]
            .iter()
            .map(|id| ContentItem {
                id: id.to_string(),
                parent_id: None,
                sort_order: 0,
                fields: BTreeMap::new(),
            })
            .collect();
        Arc::new(InMemoryContentStore::from_items(items))
    }

    fn query(nodes: &str) -> ContentListQuery {
        ContentListQuery::new(
            ListConfig::for_source(NODE_SOURCE_KEY).with_parameter("nodes", nodes),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn lists_ids_in_configured_order() {
        let source = NodeDataSource::new(store());
        let items = source
            .query(
                &query("c,a,b"),
                PagingWindow {
                    pre_skip: 0,
                    skip: 0,
                    take: 10,
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn unresolved_ids_are_dropped() {
        let source = NodeDataSource::new(store());
        assert_eq!(source.count(&query("a,ghost,b"), 0).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn count_subtracts_pre_skip() {
        let source = NodeDataSource::new(store());
        assert_eq!(source.count(&query("a,b,c"), 1).await.unwrap(), 2);
        assert_eq!(source.count(&query("a"), 5).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn window_applies_skips() {
        let source = NodeDataSource::new(store());
        let items = source
            .query(
                &query("a,b,c,d"),
                PagingWindow {
                    pre_skip: 1,
                    skip: 1,
                    take: 1,
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["c"]);
    }
}
