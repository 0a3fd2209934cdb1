use std::path::PathBuf;

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::debug;

use crate::error::{Error, Result};

/// Explicit connection descriptor.
///
/// Nothing here is implicit: when `kubeconfig` is `None` the standard
/// `$KUBECONFIG`/`~/.kube/config` lookup applies, and when `context` is
/// `None` the kubeconfig's current context is used. Callers that want a
/// different default compute it themselves and pass it in.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    /// Path to the kubeconfig file to read.
    pub kubeconfig: Option<PathBuf>,
    /// Context within the kubeconfig to target.
    pub context: Option<String>,
}

impl ConnectionOptions {
    fn read_kubeconfig(&self) -> Result<Kubeconfig> {
        match &self.kubeconfig {
            Some(path) => Kubeconfig::read_from(path)
                .map_err(|err| Error::Connection(format!("failed to read {path:?}: {err}"))),
            None => Kubeconfig::read().map_err(|err| Error::Connection(err.to_string())),
        }
    }
}

/// Open a client for the cluster selected by `options`.
///
/// Fails with [`Error::Connection`] when the kubeconfig cannot be read or
/// does not yield a usable client configuration. Reaching an unreachable or
/// unauthenticated endpoint surfaces later, on the first request.
pub async fn connect(options: &ConnectionOptions) -> Result<Client> {
    let kubeconfig = options.read_kubeconfig()?;
    let kube_options = KubeConfigOptions {
        context: options.context.clone(),
        ..Default::default()
    };

    let config = Config::from_custom_kubeconfig(kubeconfig, &kube_options)
        .await
        .map_err(|err| Error::Connection(err.to_string()))?;
    debug!(cluster_url = %config.cluster_url, "connecting");

    Client::try_from(config).map_err(|err| Error::Connection(err.to_string()))
}

/// Determine the namespace to list workloads in.
///
/// Priority: the explicitly supplied namespace, then the namespace recorded
/// for the selected context in the kubeconfig, then `"default"`.
pub fn determine_namespace(namespace: Option<String>, options: &ConnectionOptions) -> String {
    if let Some(namespace) = namespace {
        return namespace;
    }

    let Ok(kubeconfig) = options.read_kubeconfig() else {
        return String::from("default");
    };
    let context_name = options
        .context
        .clone()
        .or_else(|| kubeconfig.current_context.clone());

    kubeconfig
        .contexts
        .iter()
        .find(|named| Some(named.name.as_str()) == context_name.as_deref())
        .and_then(|named| named.context.as_ref().and_then(|ctx| ctx.namespace.clone()))
        .unwrap_or_else(|| String::from("default"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_namespace_wins() {
        let options = ConnectionOptions::default();
        assert_eq!(
            determine_namespace(Some(String::from("staging")), &options),
            "staging"
        );
    }

    #[test]
    fn unreadable_kubeconfig_falls_back_to_default_namespace() {
        let options = ConnectionOptions {
            kubeconfig: Some(PathBuf::from("/nonexistent/kubeconfig")),
            context: None,
        };
        assert_eq!(determine_namespace(None, &options), "default");
    }
}
