//! Deterministic configuration hashing.
//!
//! Each list configuration is reduced to a short, URL-safe key used both as
//! a cache namespace and as the query-string parameter name carrying the
//! list's page number. Several independently configured lists can then
//! coexist on one page without parameter collisions.
//!
//! The key is the first 128 bits of a SHA-256 digest over a canonical
//! serialization of the configuration, encoded with the unpadded base64url
//! alphabet (22 characters). Parameters are sorted by key before hashing so
//! insertion order never changes the result, and the digest is unseeded so
//! keys are stable across processes and machines.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::config::ListConfig;

/// Derive the hash key for a configuration.
///
/// `None` hashes deterministically as well; it is the identity of the
/// default, unconfigured list.
pub fn create_hash(config: Option<&ListConfig>) -> String {
    let canonical = canonical_form(config);
    let digest = Sha256::digest(canonical.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..16])
}

/// Canonical byte form of a configuration: selector, paging settings, then
/// parameters sorted by key. Equal configurations serialize identically.
fn canonical_form(config: Option<&ListConfig>) -> String {
    let mut out = String::new();
    if let Some(config) = config {
        out.push_str("source=");
        out.push_str(&config.source);
        out.push('\n');
        out.push_str(&format!("page_size={}\n", config.page_size));
        out.push_str(&format!("pre_skip={}\n", config.pre_skip));
        out.push_str(&format!("show_paging={}\n", config.show_paging));

        let mut params: Vec<(&str, &str)> = config
            .parameters
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect();
        params.sort();
        for (key, value) in params {
            out.push_str(&format!("param:{key}={value}\n"));
        }
    }
    out
}
