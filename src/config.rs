//! List configuration: data-source selector, named parameters, and paging
//! settings.
//!
//! A [`ListConfig`] is authored outside this crate (typically by an editor
//! UI) and is read-only at render time. Two configurations with the same
//! selector, parameter set, and paging settings are the same list for
//! hashing purposes, regardless of parameter insertion order.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One named parameter on a list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub key: String,
    pub value: String,
}

/// Configuration for a single rendered list instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Stable identifier of the data source backend (e.g. `"search"`).
    pub source: String,
    /// Named parameters consumed by the backend.
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Fixed backend-side offset applied before page-derived skipping
    /// (e.g. to hide a pinned leading item).
    #[serde(default)]
    pub pre_skip: u64,
    /// Whether paging UI may render at all for this list.
    #[serde(default = "default_show_paging")]
    pub show_paging: bool,
}

fn default_page_size() -> u64 {
    10
}

fn default_show_paging() -> bool {
    true
}

impl ListConfig {
    /// A minimal configuration for the given data source key.
    pub fn for_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            parameters: Vec::new(),
            page_size: default_page_size(),
            pre_skip: 0,
            show_paging: true,
        }
    }

    /// Add a named parameter (builder style).
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(ParameterValue {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Set the page size (builder style).
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Look up a named parameter value.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Check the configuration before any index or content access.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfiguration(
                "page_size must be > 0".to_string(),
            ));
        }
        if self.source.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "source must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a list configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ListConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))
        .map_err(|e| Error::InvalidConfiguration(format!("{e:#}")))?;

    let config: ListConfig = toml::from_str(&content)
        .map_err(|e| Error::InvalidConfiguration(format!("Failed to parse config file: {e}")))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml = r#"
source = "search"
page_size = 5
pre_skip = 2

[[parameters]]
key = "index"
value = "articles"

[[parameters]]
key = "query_parameter"
value = "q"
"#;
        let config: ListConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.source, "search");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.pre_skip, 2);
        assert!(config.show_paging);
        assert_eq!(config.parameter("index"), Some("articles"));
        assert_eq!(config.parameter("query_parameter"), Some("q"));
        assert_eq!(config.parameter("missing"), None);
    }

    #[test]
    fn defaults_apply() {
        let config: ListConfig = toml::from_str("source = \"children\"").unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.pre_skip, 0);
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let config = ListConfig::for_source("search").with_page_size(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_source_is_invalid() {
        let config = ListConfig::for_source("  ");
        assert!(config.validate().is_err());
    }
}
