//! Name listings for the statically known workload kinds.
//!
//! This is a thin collaborator next to the resolver: it needs only a client
//! and a namespace, never the discovery index.

use k8s_openapi::{
    NamespaceResourceScope,
    api::{
        apps::v1::Deployment,
        core::v1::{Pod, Service},
    },
};
use kube::{Api, Client, Resource, api::ListParams};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// List the names of every object of kind `K` in `namespace`, in the order
/// the API server returns them.
pub async fn list_names<K>(client: &Client, namespace: &str) -> Result<Vec<String>>
where
    K: Clone + std::fmt::Debug + DeserializeOwned + Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    let api = Api::<K>::namespaced(client.clone(), namespace);
    let objects = api
        .list(&ListParams::default())
        .await
        .map_err(|err| Error::Connection(err.to_string()))?;
    debug!(namespace, count = objects.items.len(), "listed objects");

    Ok(objects
        .items
        .into_iter()
        .filter_map(|object| object.meta().name.clone())
        .collect())
}

pub async fn list_pods(client: &Client, namespace: &str) -> Result<Vec<String>> {
    list_names::<Pod>(client, namespace).await
}

pub async fn list_deployments(client: &Client, namespace: &str) -> Result<Vec<String>> {
    list_names::<Deployment>(client, namespace).await
}

pub async fn list_services(client: &Client, namespace: &str) -> Result<Vec<String>> {
    list_names::<Service>(client, namespace).await
}
