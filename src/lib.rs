#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::fmt;

pub use k8s_openapi;
pub use kube;

pub mod claputil;
pub mod connect;
pub mod discover;
pub mod error;
pub mod list;

pub use connect::{ConnectionOptions, connect, determine_namespace};
pub use discover::{DiscoveryIndex, ResourceEntry};
pub use error::{Error, Result};

use discover::ResourceEntry as Entry;

/// A group/version pair, used to report which API groups serve an ambiguous
/// resource name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    pub fn new(group: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group.is_empty() {
            "core"
        } else {
            &self.group
        };
        write!(f, "{group}/{}", self.version)
    }
}

/// The canonical identity of an API resource kind.
///
/// Only produced by [`resolve`]; `group` is the empty string for the core
/// API group (rendered as `core` for display).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Gvr {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl Gvr {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            group: entry.group.clone(),
            version: entry.version.clone(),
            resource: entry.resource.clone(),
        }
    }

    /// The `apiVersion` string this identity belongs to, e.g. `v1` or
    /// `apps/v1`.
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for Gvr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group.is_empty() {
            "core"
        } else {
            &self.group
        };
        write!(f, "{group}/{}/{}", self.version, self.resource)
    }
}

/// Resolve a free-text resource token against a discovery snapshot.
///
/// Matching runs in strict tier order: exact plural name, then short name,
/// then singular form (including the lowercased kind and the token with a
/// trailing `s`/`es` stripped). The first tier that yields candidates
/// decides; a tier with several distinct candidates fails with
/// [`Error::Ambiguous`] rather than falling through to the next tier.
///
/// Pure over its inputs: no I/O, no retries, and a deterministic result for
/// a fixed index and query. An empty or whitespace-only query resolves to
/// [`Error::NotFound`].
pub fn resolve(query: &str, index: &DiscoveryIndex) -> Result<Gvr> {
    let token = query.trim().to_lowercase();
    if token.is_empty() {
        return Err(Error::NotFound {
            query: query.to_string(),
        });
    }

    let tiers: [&dyn Fn(&Entry) -> bool; 3] = [
        &|entry| entry.matches_plural(&token),
        &|entry| entry.matches_short_name(&token),
        &|entry| entry.matches_singular(&token),
    ];

    for tier in tiers {
        match select_candidates(index, tier).as_slice() {
            [] => continue,
            [only] => return Ok(Gvr::from_entry(only)),
            candidates => {
                return Err(Error::Ambiguous {
                    query: query.to_string(),
                    candidates: candidates
                        .iter()
                        .map(|entry| GroupVersion::new(entry.group.clone(), entry.version.clone()))
                        .collect(),
                });
            }
        }
    }

    Err(Error::NotFound {
        query: query.to_string(),
    })
}

/// Collect the entries matched by one tier, deduplicated by identity and
/// sorted by (group, version) so decisions never depend on index order.
fn select_candidates<'a>(
    index: &'a DiscoveryIndex,
    matches: &dyn Fn(&Entry) -> bool,
) -> Vec<&'a Entry> {
    let mut candidates: Vec<&Entry> = index.entries().iter().filter(|e| matches(e)).collect();
    candidates.sort_by(|a, b| {
        (&a.group, &a.version, &a.resource).cmp(&(&b.group, &b.version, &b.resource))
    });
    candidates.dedup_by(|a, b| {
        a.group == b.group && a.version == b.version && a.resource == b.resource
    });
    candidates
}
