//! Render-model orchestration: configuration in, items and paging out.

use std::sync::Arc;

use crate::config::ListConfig;
use crate::content::Listable;
use crate::datasource::DataSourceRegistry;
use crate::error::Result;
use crate::hash::create_hash;
use crate::paging::{compute_paging, Paging};
use crate::query::ContentListQuery;

/// Everything a rendering layer needs for one list instance.
pub struct ContentListModel {
    /// The items for the current page, in backend order.
    pub items: Vec<Arc<dyn Listable>>,
    /// Paging state for the pager.
    pub paging: Paging,
    /// The list's hash key; also the query-string parameter carrying its
    /// page number.
    pub hash: String,
    /// The query context the items were produced from.
    pub query: ContentListQuery,
}

/// Resolve a configuration against the registry and execute one render's
/// worth of querying.
///
/// The current page number is read from the ambient lookup under the
/// configuration's own hash key, so co-located lists never steal each
/// other's page parameter. Count runs before paging so the requested page
/// can be clamped to the real page range.
pub async fn build_model(
    registry: &DataSourceRegistry,
    config: &ListConfig,
    ambient: Vec<(String, String)>,
) -> Result<ContentListModel> {
    config.validate()?;
    let source = registry.resolve(&config.source)?;

    let hash = create_hash(Some(config));
    let query = ContentListQuery::new(config.clone(), ambient);

    let requested_page = query
        .ambient(&hash)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);

    let total = source.count(&query, config.pre_skip).await?;
    let mut paging = compute_paging(total, config.page_size, requested_page)?;
    paging.show_paging = paging.pages() > 1 && config.show_paging;

    let window = paging.window(config.pre_skip);
    let items = source.query(&query, window).await?;

    Ok(ContentListModel {
        items,
        paging,
        hash,
        query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentItem, InMemoryContentStore};
    use crate::datasource::default_registry;
    use crate::error::Error;
    use crate::index::memory::MemoryIndexProvider;
    use std::collections::BTreeMap;

    fn store_with_children(n: usize) -> Arc<InMemoryContentStore> {
        let mut items = vec![ContentItem {
            id: "root".to_string(),
            parent_id: None,
            sort_order: 0,
            fields: BTreeMap::new(),
        }];
        for i in 0..n {
            items.push(ContentItem {
                id: format!("child-{i:02}"),
                parent_id: Some("root".to_string()),
                sort_order: i as i64,
                fields: BTreeMap::new(),
            });
        }
        Arc::new(InMemoryContentStore::from_items(items))
    }

    fn registry(n: usize) -> DataSourceRegistry {
        default_registry(store_with_children(n), Arc::new(MemoryIndexProvider::new()))
    }

    fn children_config() -> ListConfig {
        ListConfig::for_source("children")
            .with_parameter("parent", "root")
            .with_page_size(5)
    }

    #[tokio::test]
    async fn builds_first_page_by_default() {
        let model = build_model(&registry(12), &children_config(), Vec::new())
            .await
            .unwrap();
        assert_eq!(model.paging.page, 1);
        assert_eq!(model.paging.total, 12);
        assert_eq!(model.paging.pages(), 3);
        assert_eq!(model.items.len(), 5);
        assert_eq!(model.items[0].id(), "child-00");
        assert!(model.paging.show_paging);
    }

    #[tokio::test]
    async fn reads_page_from_ambient_under_own_hash_key() {
        let config = children_config();
        let hash = create_hash(Some(&config));
        let ambient = vec![(hash.clone(), "2".to_string())];

        let model = build_model(&registry(12), &config, ambient).await.unwrap();
        assert_eq!(model.paging.page, 2);
        assert_eq!(model.items[0].id(), "child-05");
        assert_eq!(model.hash, hash);
    }

    #[tokio::test]
    async fn foreign_page_parameters_are_ignored() {
        let ambient = vec![("someotherkey".to_string(), "9".to_string())];
        let model = build_model(&registry(12), &children_config(), ambient)
            .await
            .unwrap();
        assert_eq!(model.paging.page, 1);
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped() {
        let config = children_config();
        let hash = create_hash(Some(&config));
        let model = build_model(&registry(12), &config, vec![(hash, "99".to_string())])
            .await
            .unwrap();
        assert_eq!(model.paging.page, 3);
        assert_eq!(model.items.len(), 2);
    }

    #[tokio::test]
    async fn single_page_hides_paging() {
        let model = build_model(&registry(3), &children_config(), Vec::new())
            .await
            .unwrap();
        assert!(!model.paging.show_paging);
    }

    #[tokio::test]
    async fn disabled_paging_stays_hidden() {
        let mut config = children_config();
        config.show_paging = false;
        let model = build_model(&registry(12), &config, Vec::new()).await.unwrap();
        assert!(!model.paging.show_paging);
    }

    #[tokio::test]
    async fn unknown_source_fails_before_any_query() {
        let err = build_model(&registry(3), &ListConfig::for_source("nope"), Vec::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownDataSource(_)));
    }

    #[tokio::test]
    async fn invalid_page_size_fails_fast() {
        let config = children_config().with_page_size(0);
        let err = build_model(&registry(3), &config, Vec::new()).await.err().unwrap();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn pre_skip_hides_leading_items() {
        let mut config = children_config();
        config.pre_skip = 2;
        let model = build_model(&registry(12), &config, Vec::new()).await.unwrap();
        assert_eq!(model.paging.total, 10);
        assert_eq!(model.items[0].id(), "child-02");
    }
}
