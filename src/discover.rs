use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use kube::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod client;
use client::DiscoverClient;

/// One resource kind registered with the cluster, normalized at load time.
///
/// All name fields are trimmed and lowercased; the core API group is
/// represented by an empty `group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// API group, empty for the core group.
    pub group: String,
    /// Served version of the group.
    pub version: String,
    /// Plural resource name, e.g. "pods".
    pub resource: String,
    /// Singular resource name, e.g. "pod".
    pub singular: String,
    /// Kind name, e.g. "Pod".
    pub kind: String,
    /// Abbreviations, e.g. ["po"].
    pub short_names: Vec<String>,
    pub namespaced: bool,
}

impl ResourceEntry {
    pub(crate) fn matches_plural(&self, token: &str) -> bool {
        self.resource == token
    }

    pub(crate) fn matches_short_name(&self, token: &str) -> bool {
        self.short_names.iter().any(|name| name == token)
    }

    /// Singular-form tier: the token itself, the lowercased kind, or the
    /// token with a trailing "s"/"es" stripped.
    pub(crate) fn matches_singular(&self, token: &str) -> bool {
        if self.singular == token || self.kind.to_lowercase() == token {
            return true;
        }
        let stripped_s = token.strip_suffix('s');
        let stripped_es = token.strip_suffix("es");
        stripped_s.is_some_and(|stem| stem == self.singular)
            || stripped_es.is_some_and(|stem| stem == self.singular)
    }

    fn from_api_resource(api_resource: &APIResource) -> Option<Self> {
        // Subresources such as "pods/status" are not standalone kinds.
        if api_resource.name.contains('/') {
            return None;
        }

        let group = match api_resource.group.as_deref().map(str::trim) {
            // The discover client labels the core group as "core";
            // canonical identity uses the empty string.
            Some("core") | None => String::new(),
            Some(group) => group.to_lowercase(),
        };
        let version = api_resource.version.as_deref()?.trim().to_lowercase();
        let resource = api_resource.name.trim().to_lowercase();
        if resource.is_empty() || version.is_empty() {
            return None;
        }

        let singular = match api_resource.singular_name.trim() {
            // Built-in kinds often publish an empty singularName;
            // fall back to the plural with its trailing "s" dropped.
            "" => resource.strip_suffix('s').unwrap_or(&resource).to_string(),
            singular => singular.to_lowercase(),
        };

        Some(Self {
            group,
            version,
            resource,
            singular,
            kind: api_resource.kind.trim().to_string(),
            short_names: api_resource
                .short_names
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
            namespaced: api_resource.namespaced,
        })
    }
}

/// Snapshot of every resource kind the connected cluster serves.
///
/// Loaded once per run and read-only afterwards; resolution always acts on a
/// consistent snapshot even if the live API surface changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryIndex {
    entries: Vec<ResourceEntry>,
}

impl DiscoveryIndex {
    /// Fetch the cluster's discovery document and build the index.
    ///
    /// Performs exactly one discovery walk. Fails with
    /// [`Error::Connection`] when the endpoint is unreachable or rejects the
    /// credentials, and with [`Error::DiscoveryUnavailable`] when the cluster
    /// answers but the document is malformed or empty. Never yields a
    /// partially populated index.
    pub async fn load(client: &Client) -> Result<Self> {
        let resources = DiscoverClient::new(client.clone())
            .list_api_resources()
            .await?;
        Self::from_api_resources(&resources)
    }

    /// Build the index from a caller-supplied discovery document, e.g. one
    /// fetched earlier in the same run. Applies the same normalization as
    /// [`DiscoveryIndex::load`].
    pub fn from_api_resources(resources: &[APIResource]) -> Result<Self> {
        let entries = resources
            .iter()
            .filter_map(ResourceEntry::from_api_resource)
            .collect::<Vec<_>>();

        if entries.is_empty() {
            return Err(Error::DiscoveryUnavailable(String::from(
                "the discovery document lists no resources",
            )));
        }

        Ok(Self { entries })
    }

    /// Build the index from already-normalized entries.
    pub fn from_entries(entries: Vec<ResourceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
