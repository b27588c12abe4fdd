//! Request-time query context.
//!
//! A [`ContentListQuery`] bundles the resolved inputs for one render: the
//! list configuration and the current request's query-string pairs. It is
//! immutable for the duration of the render.

use crate::config::ListConfig;

/// The resolved inputs for querying one list during one request.
#[derive(Debug, Clone)]
pub struct ContentListQuery {
    config: ListConfig,
    ambient: Vec<(String, String)>,
}

impl ContentListQuery {
    /// Build a query context from a configuration and the request's
    /// query-string pairs (in original order).
    pub fn new(config: ListConfig, ambient: Vec<(String, String)>) -> Self {
        Self { config, ambient }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// A named parameter from the configuration.
    pub fn custom_parameter(&self, key: &str) -> Option<&str> {
        self.config.parameter(key)
    }

    /// A value from the request's ambient key/value lookup (first match).
    pub fn ambient(&self, key: &str) -> Option<&str> {
        self.ambient
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All query-string pairs in original order.
    pub fn ambient_pairs(&self) -> &[(String, String)] {
        &self.ambient
    }
}

/// Split a raw query string (`"a=1&b=2"`) into ordered key/value pairs.
///
/// A leading `?` is tolerated. Keys without `=` get an empty value. No
/// percent-decoding is performed; pairs are carried verbatim so that link
/// rewriting preserves them byte for byte.
pub fn parse_query_string(raw: &str) -> Vec<(String, String)> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    raw.split('&')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs() {
        let pairs = parse_query_string("a=1&b=2&c=");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn parse_tolerates_question_mark_and_empty() {
        assert_eq!(parse_query_string("?x=y"), vec![("x".to_string(), "y".to_string())]);
        assert!(parse_query_string("").is_empty());
        assert!(parse_query_string("?").is_empty());
    }

    #[test]
    fn ambient_returns_first_match() {
        let query = ContentListQuery::new(
            ListConfig::for_source("node"),
            parse_query_string("q=first&q=second"),
        );
        assert_eq!(query.ambient("q"), Some("first"));
        assert_eq!(query.ambient("missing"), None);
    }

    #[test]
    fn custom_parameter_reads_config() {
        let query = ContentListQuery::new(
            ListConfig::for_source("search").with_parameter("index", "articles"),
            Vec::new(),
        );
        assert_eq!(query.custom_parameter("index"), Some("articles"));
    }
}
