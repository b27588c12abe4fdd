//! Child-node listing backend.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::content::{ContentStore, Listable};
use crate::error::Result;
use crate::paging::PagingWindow;
use crate::query::ContentListQuery;

use super::{apply_window, DataSource, DataSourceMetadata, DataSourceParameter};

pub const CHILDREN_SOURCE_KEY: &str = "children";

/// Lists the children of the node named by the `parent` parameter.
///
/// Ordering follows the `sort` parameter: `sortorder` (the default) uses
/// the store's sibling order, any other value sorts by that field.
pub struct ChildrenDataSource {
    content: Arc<dyn ContentStore>,
}

impl ChildrenDataSource {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    async fn list(&self, query: &ContentListQuery) -> Result<Vec<Arc<dyn Listable>>> {
        let Some(parent) = query
            .custom_parameter("parent")
            .filter(|p| !p.trim().is_empty())
        else {
            debug!("children source: no parent configured, listing nothing");
            return Ok(Vec::new());
        };

        let mut children = self.content.children(parent).await?;

        match query.custom_parameter("sort") {
            None | Some("sortorder") => {}
            Some(field) => {
                children.sort_by(|a, b| match (a.field(field), b.field(field)) {
                    (Some(av), Some(bv)) => av.cmp(bv),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
            }
        }

        Ok(children)
    }
}

#[async_trait]
impl DataSource for ChildrenDataSource {
    fn metadata(&self) -> DataSourceMetadata {
        DataSourceMetadata {
            key: CHILDREN_SOURCE_KEY,
            name: "Child Nodes",
            parameters: vec![
                DataSourceParameter {
                    key: "parent",
                    label: "Parent node id",
                    view: "textbox",
                },
                DataSourceParameter {
                    key: "sort",
                    label: "Sort field",
                    view: "textbox",
                },
            ],
        }
    }

    async fn count(&self, query: &ContentListQuery, pre_skip: u64) -> Result<u64> {
        let total = self.list(query).await?.len() as u64;
        Ok(total.saturating_sub(pre_skip))
    }

    async fn query(
        &self,
        query: &ContentListQuery,
        window: PagingWindow,
    ) -> Result<Vec<Arc<dyn Listable>>> {
        Ok(apply_window(self.list(query).await?, window))
    }
}
