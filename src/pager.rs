//! Pager link and markup construction.
//!
//! For every page number the pager emits either a plain `<span>` (the
//! current page) or an anchor whose href is the current URL's path plus the
//! original query string with this list's page parameter replaced in place
//! (appended if absent). All other parameters, including another list's
//! identity parameter, are preserved verbatim, so several independently
//! configured lists can page on one URL without disturbing each other.

use crate::paging::Paging;

/// Cosmetic rendering options. None of these affect which links are
/// produced.
#[derive(Debug, Clone, Default)]
pub struct PagerOptions {
    /// Class suffix appended after `"pagination "` on the wrapper.
    pub pager_class: Option<String>,
    /// Class for each item wrapper (the current item also gets `active`).
    pub item_class: Option<String>,
    /// Class for each anchor.
    pub anchor_class: Option<String>,
    /// Wrapper element name; `div` when unset.
    pub wrapper_element: Option<String>,
    /// Item wrapper element name; items are unwrapped when unset.
    pub item_element: Option<String>,
    /// Current URL path prefixed to every href.
    pub path: Option<String>,
}

/// Serialize query-string pairs with this list's page parameter set to
/// `page`, preserving every other pair and its position.
fn page_query_string(pairs: &[(String, String)], page_param: &str, page: u64) -> String {
    let mut pairs: Vec<(String, String)> = pairs.to_vec();
    match pairs.iter_mut().find(|(k, _)| k == page_param) {
        Some((_, v)) => *v = page.to_string(),
        None => pairs.push((page_param.to_string(), page.to_string())),
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<String>>()
        .join("&")
}

fn open_tag(element: &str, class: &str) -> String {
    if class.is_empty() {
        format!("<{element}>")
    } else {
        format!("<{element} class=\"{class}\">")
    }
}

/// Render the pager markup for one list.
///
/// Returns an empty string when there is at most one page or when paging
/// has been explicitly disabled.
pub fn render_pager(
    paging: &Paging,
    page_param: &str,
    query_string: &[(String, String)],
    options: &PagerOptions,
) -> String {
    let pages = paging.pages();
    if !paging.show_paging || pages <= 1 {
        return String::new();
    }

    let wrapper = options.wrapper_element.as_deref().unwrap_or("div");
    let wrapper_class = format!(
        "pagination {}",
        options.pager_class.as_deref().unwrap_or_default()
    );
    let path = options.path.as_deref().unwrap_or_default();

    let mut html = open_tag(wrapper, &wrapper_class);

    for page in 1..=pages {
        let inner = if page == paging.page {
            format!("<span>{page}</span>")
        } else {
            let href = format!(
                "{path}?{}",
                page_query_string(query_string, page_param, page)
            );
            match options.anchor_class.as_deref() {
                Some(class) => format!("<a class=\"{class}\" href=\"{href}\">{page}</a>"),
                None => format!("<a href=\"{href}\">{page}</a>"),
            }
        };

        match options.item_element.as_deref() {
            Some(item) => {
                let mut class = options.item_class.clone().unwrap_or_default();
                if page == paging.page {
                    if !class.is_empty() {
                        class.push(' ');
                    }
                    class.push_str("active");
                }
                html.push_str(&open_tag(item, &class));
                html.push_str(&inner);
                html.push_str(&format!("</{item}>"));
            }
            None => html.push_str(&inner),
        }
    }

    html.push_str(&format!("</{wrapper}>"));
    html
}
