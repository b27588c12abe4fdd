//! Error types for list resolution and querying.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the list engine.
///
/// Configuration problems fail fast, before any index or content access.
/// Backend failures are fatal for the current render; retry policy, if any,
/// belongs to the external index client. Stale content references are never
/// surfaced; the affected items are dropped during hit adaptation instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot produce a valid query (e.g. a zero page size
    /// or an unparseable configuration file).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configured data-source selector does not resolve to a registered
    /// backend.
    #[error("unknown data source: {0}")]
    UnknownDataSource(String),

    /// A collaborator (index provider, searcher, content store) failed.
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}
