//! End-to-end tests: configuration through data source, paging, and pager
//! link construction, with two lists sharing one page.

use std::collections::BTreeMap;
use std::sync::Arc;

use content_list::config::ListConfig;
use content_list::content::{ContentItem, InMemoryContentStore};
use content_list::datasource::{default_registry, DataSourceRegistry};
use content_list::hash::create_hash;
use content_list::index::memory::{MemoryIndex, MemoryIndexProvider};
use content_list::index::DEFAULT_INDEX;
use content_list::model::build_model;
use content_list::pager::{render_pager, PagerOptions};
use content_list::query::parse_query_string;

fn item(id: &str, parent: Option<&str>, sort: i64, title: &str, body: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        parent_id: parent.map(str::to_string),
        sort_order: sort,
        fields: [
            ("title".to_string(), title.to_string()),
            ("body".to_string(), body.to_string()),
        ]
        .into_iter()
        .collect::<BTreeMap<String, String>>(),
    }
}

/// Eleven articles under one root, all indexed.
fn setup() -> DataSourceRegistry {
    let mut items = vec![item("root", None, 0, "Root", "")];
    for i in 0..11 {
        items.push(item(
            &format!("article-{i:02}"),
            Some("root"),
            i,
            &format!("Article {i}"),
            if i % 2 == 0 {
                "A story about a red car"
            } else {
                "A story about a blue boat"
            },
        ));
    }

    let index = MemoryIndex::new();
    for item in &items {
        if item.id != "root" {
            index.add_item(item);
        }
    }

    let store = Arc::new(InMemoryContentStore::from_items(items));
    let provider =
        Arc::new(MemoryIndexProvider::new().with_index(DEFAULT_INDEX, Arc::new(index)));
    default_registry(store, provider)
}

fn children_config(page_size: u64) -> ListConfig {
    ListConfig::for_source("children")
        .with_parameter("parent", "root")
        .with_page_size(page_size)
}

fn search_config() -> ListConfig {
    ListConfig::for_source("search")
        .with_parameter("query_parameter", "q")
        .with_page_size(5)
}

/// Extract the first href from rendered pager markup.
fn first_href(html: &str) -> &str {
    let start = html.find("href=\"").expect("no href in pager") + 6;
    let end = html[start..].find('"').unwrap() + start;
    &html[start..end]
}

#[tokio::test]
async fn pager_round_trip_advances_one_page() {
    let registry = setup();
    let config = children_config(5);

    let model = build_model(&registry, &config, Vec::new()).await.unwrap();
    assert_eq!(model.paging.page, 1);

    // The first link in a page-1 pager points at page 2.
    let pager = render_pager(
        &model.paging,
        &model.hash,
        model.query.ambient_pairs(),
        &PagerOptions::default(),
    );
    let href = first_href(&pager);
    let next_ambient = parse_query_string(href);

    let next = build_model(&registry, &config, next_ambient).await.unwrap();
    assert_eq!(next.paging.page, 2);
    assert_eq!(next.items[0].id(), "article-05");
}

#[tokio::test]
async fn single_page_list_renders_no_pager() {
    let registry = setup();
    let config = children_config(11);
    let model = build_model(&registry, &config, Vec::new()).await.unwrap();

    let pager = render_pager(
        &model.paging,
        &model.hash,
        model.query.ambient_pairs(),
        &PagerOptions::default(),
    );
    assert_eq!(pager, "");
}

#[tokio::test]
async fn second_of_two_pages_renders_current_as_plain_text() {
    let registry = setup();
    // 11 children, page size 6: two pages.
    let config = children_config(6);
    let hash = create_hash(Some(&config));

    let ambient = vec![(hash.clone(), "2".to_string())];
    let model = build_model(&registry, &config, ambient).await.unwrap();
    assert_eq!(model.paging.pages(), 2);

    let pager = render_pager(
        &model.paging,
        &model.hash,
        model.query.ambient_pairs(),
        &PagerOptions::default(),
    );
    assert!(pager.contains(&format!("<a href=\"?{hash}=1\">1</a>")), "pager: {pager}");
    assert!(pager.contains("<span>2</span>"), "pager: {pager}");
}

#[tokio::test]
async fn two_lists_on_one_page_keep_their_parameters_apart() {
    let registry = setup();

    let list_a = children_config(5);
    let list_b = search_config();
    let hash_a = create_hash(Some(&list_a));
    let hash_b = create_hash(Some(&list_b));
    assert_ne!(hash_a, hash_b);

    // List B is on page 2 of its search results; list A renders its own
    // pager against the same query string.
    let qs = format!("q=story&{hash_b}=2");
    let ambient = parse_query_string(&qs);

    let model_a = build_model(&registry, &list_a, ambient.clone()).await.unwrap();
    assert_eq!(model_a.paging.page, 1);

    let pager_a = render_pager(
        &model_a.paging,
        &model_a.hash,
        model_a.query.ambient_pairs(),
        &PagerOptions::default(),
    );
    // List B's state rides along untouched in list A's links.
    assert!(
        pager_a.contains(&format!("href=\"?q=story&{hash_b}=2&{hash_a}=2\"")),
        "pager: {pager_a}"
    );

    let model_b = build_model(&registry, &list_b, ambient).await.unwrap();
    assert_eq!(model_b.paging.page, 2);
}

#[tokio::test]
async fn search_list_stays_empty_until_a_phrase_arrives() {
    let registry = setup();
    let config = search_config();

    let empty = build_model(&registry, &config, Vec::new()).await.unwrap();
    assert_eq!(empty.paging.total, 0);
    assert!(empty.items.is_empty());

    let filtered = build_model(&registry, &config, parse_query_string("q=red"))
        .await
        .unwrap();
    assert_eq!(filtered.paging.total, 6);
    assert_eq!(filtered.items.len(), 5);
}

#[tokio::test]
async fn search_paging_pushes_skip_into_the_index() {
    let registry = setup();
    let config = search_config();
    let hash = create_hash(Some(&config));

    let qs = format!("q=story&{hash}=3");
    let model = build_model(&registry, &config, parse_query_string(&qs))
        .await
        .unwrap();
    assert_eq!(model.paging.total, 11);
    assert_eq!(model.paging.pages(), 3);
    assert_eq!(model.paging.page, 3);
    assert_eq!(model.items.len(), 1);
}
