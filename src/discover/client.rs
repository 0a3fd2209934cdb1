use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIGroupList, APIResource, APIResourceList, APIVersions,
};
use kube::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result, classify_discovery_error};

/// Walks the legacy discovery endpoints (`/api`, `/apis`) and returns every
/// served resource with its `group` and `version` filled in.
///
/// kube's high-level `Discovery` drops the `shortNames` field
/// (https://github.com/kube-rs/kube/issues/1002), so abbreviations like `po`
/// would be unresolvable through it. Fetching the raw `APIResourceList`
/// documents keeps them.
pub struct DiscoverClient {
    client: Client,
}

impl DiscoverClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the full discovery document in one walk.
    ///
    /// Each API group contributes its preferred version, or the last
    /// advertised one when no preference is published.
    pub async fn list_api_resources(&self) -> Result<Vec<APIResource>> {
        let mut resources = Vec::new();

        let core: APIVersions = self.get("/api").await?;
        for version in &core.versions {
            debug!(version = version.as_str(), "listing core API resources");
            let list: APIResourceList = self.get(&format!("/api/{version}")).await?;
            collect_resources(&mut resources, &list, "core", version);
        }

        let groups: APIGroupList = self.get("/apis").await?;
        for group in &groups.groups {
            let Some(version) = preferred_version(group) else {
                debug!(group = group.name.as_str(), "skipping group with no served versions");
                continue;
            };
            debug!(
                group = group.name.as_str(),
                version, "listing group API resources"
            );
            let list: APIResourceList = self
                .get(&format!("/apis/{}/{version}", group.name))
                .await?;
            collect_resources(&mut resources, &list, &group.name, version);
        }

        Ok(resources)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = http::Request::builder()
            .uri(path)
            .body(Vec::new())
            .map_err(|err| Error::Connection(err.to_string()))?;
        self.client
            .request(request)
            .await
            .map_err(classify_discovery_error)
    }
}

fn preferred_version(group: &APIGroup) -> Option<&str> {
    group
        .preferred_version
        .as_ref()
        .map(|preferred| preferred.version.as_str())
        .or_else(|| group.versions.last().map(|gv| gv.version.as_str()))
}

fn collect_resources(
    resources: &mut Vec<APIResource>,
    list: &APIResourceList,
    group: &str,
    version: &str,
) {
    for resource in &list.resources {
        let mut resource = resource.clone();
        // The per-group lists leave group/version implicit; stamp them so
        // every entry is self-describing.
        resource.group = Some(group.to_string());
        resource.version = Some(version.to_string());
        resources.push(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::GroupVersionForDiscovery;

    fn group(name: &str, versions: &[&str], preferred: Option<&str>) -> APIGroup {
        APIGroup {
            name: name.to_string(),
            versions: versions
                .iter()
                .map(|version| GroupVersionForDiscovery {
                    group_version: format!("{name}/{version}"),
                    version: version.to_string(),
                })
                .collect(),
            preferred_version: preferred.map(|version| GroupVersionForDiscovery {
                group_version: format!("{name}/{version}"),
                version: version.to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn preferred_version_honors_the_advertised_preference() {
        let g = group("apps", &["v1beta1", "v1"], Some("v1"));
        assert_eq!(preferred_version(&g), Some("v1"));
    }

    #[test]
    fn preferred_version_falls_back_to_the_last_served() {
        let g = group("example.io", &["v1alpha1", "v1beta1"], None);
        assert_eq!(preferred_version(&g), Some("v1beta1"));
    }

    #[test]
    fn preferred_version_is_none_for_empty_groups() {
        let g = group("empty.io", &[], None);
        assert_eq!(preferred_version(&g), None);
    }

    #[test]
    fn collect_resources_stamps_group_and_version() {
        let list = APIResourceList {
            group_version: String::from("apps/v1"),
            resources: vec![APIResource {
                name: String::from("deployments"),
                kind: String::from("Deployment"),
                namespaced: true,
                verbs: vec![String::from("list")],
                ..Default::default()
            }],
        };

        let mut resources = Vec::new();
        collect_resources(&mut resources, &list, "apps", "v1");
        assert_eq!(resources[0].group.as_deref(), Some("apps"));
        assert_eq!(resources[0].version.as_deref(), Some("v1"));
    }
}
