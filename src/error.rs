use thiserror::Error;

use crate::GroupVersion;

/// Failure taxonomy for connecting, discovering and resolving.
///
/// `Connection` and `DiscoveryUnavailable` are fatal to the run;
/// `NotFound` and `Ambiguous` are recoverable by the caller with a
/// different query.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to reach the cluster: {0}")]
    Connection(String),

    #[error("cluster discovery data is unusable: {0}")]
    DiscoveryUnavailable(String),

    #[error("no API resource matches {query:?}")]
    NotFound { query: String },

    #[error("{query:?} is ambiguous, served by: {}", format_candidates(.candidates))]
    Ambiguous {
        query: String,
        /// Conflicting group/version pairs, sorted by (group, version).
        candidates: Vec<GroupVersion>,
    },
}

fn format_candidates(candidates: &[GroupVersion]) -> String {
    candidates
        .iter()
        .map(GroupVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classify a [`kube::Error`] raised during a discovery fetch.
///
/// Authentication rejections and transport failures mean the cluster is
/// effectively unreachable; any other API-level answer means the cluster
/// responded but its discovery data cannot be used.
pub(crate) fn classify_discovery_error(error: kube::Error) -> Error {
    match error {
        kube::Error::Api(response) if matches!(response.code, 401 | 403) => {
            Error::Connection(response.to_string())
        }
        kube::Error::Api(response) => Error::DiscoveryUnavailable(response.to_string()),
        kube::Error::SerdeError(error) => Error::DiscoveryUnavailable(error.to_string()),
        other => Error::Connection(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use kube::core::ErrorResponse;

    use super::*;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: String::from("Failure"),
            message: format!("status={code}"),
            reason: String::from("Test"),
            code,
        })
    }

    #[test]
    fn auth_rejections_classify_as_connection() {
        assert!(matches!(
            classify_discovery_error(api_error(401)),
            Error::Connection(_)
        ));
        assert!(matches!(
            classify_discovery_error(api_error(403)),
            Error::Connection(_)
        ));
    }

    #[test]
    fn other_api_statuses_classify_as_discovery_unavailable() {
        assert!(matches!(
            classify_discovery_error(api_error(404)),
            Error::DiscoveryUnavailable(_)
        ));
        assert!(matches!(
            classify_discovery_error(api_error(500)),
            Error::DiscoveryUnavailable(_)
        ));
    }

    #[test]
    fn malformed_documents_classify_as_discovery_unavailable() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            classify_discovery_error(kube::Error::SerdeError(serde_error)),
            Error::DiscoveryUnavailable(_)
        ));
    }

    #[test]
    fn non_api_errors_classify_as_connection() {
        let http_error = http::Request::builder()
            .uri("not a uri")
            .body(Vec::<u8>::new())
            .unwrap_err();
        assert!(matches!(
            classify_discovery_error(kube::Error::HttpError(http_error)),
            Error::Connection(_)
        ));
    }

    #[test]
    fn ambiguous_lists_all_candidates() {
        let error = Error::Ambiguous {
            query: String::from("events"),
            candidates: vec![
                GroupVersion::new("", "v1"),
                GroupVersion::new("events.k8s.io", "v1"),
            ],
        };
        assert_eq!(
            error.to_string(),
            "\"events\" is ambiguous, served by: core/v1, events.k8s.io/v1"
        );
    }

    #[test]
    fn not_found_carries_the_query() {
        let error = Error::NotFound {
            query: String::from("ingresses"),
        };
        assert_eq!(error.to_string(), "no API resource matches \"ingresses\"");
    }
}
