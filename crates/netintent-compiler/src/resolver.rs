//! Peer selector resolution
//!
//! Decides whether a rule crosses namespaces and builds the selector for the
//! peer on the other side. Namespace membership is taken as declared in the
//! rule; nothing is looked up in a cluster.

use std::collections::BTreeMap;

use netintent_common::policy::{EndpointSelector, LabelSelector, NetworkPolicyPeer};
use netintent_common::{APP_LABEL, CILIUM_LABEL_NAMESPACE, NAMESPACE_NAME_LABEL};

/// A resolved peer: the service's pods, optionally in another namespace
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PeerSelector {
    /// Service name selected through the `app` label
    pub service: String,
    /// Peer namespace when it differs from the policy's own namespace
    pub namespace: Option<String>,
}

/// Resolve the selector for `service` living in `rule_namespace`, as seen from
/// a policy in `policy_namespace`.
///
/// The namespace is only kept when it differs from the policy's own.
pub fn resolve_peer(service: &str, rule_namespace: &str, policy_namespace: &str) -> PeerSelector {
    PeerSelector {
        service: service.to_string(),
        namespace: (rule_namespace != policy_namespace).then(|| rule_namespace.to_string()),
    }
}

impl PeerSelector {
    /// Whether the peer lives outside the policy's namespace
    pub fn is_cross_namespace(&self) -> bool {
        self.namespace.is_some()
    }
}

impl From<&PeerSelector> for NetworkPolicyPeer {
    fn from(peer: &PeerSelector) -> Self {
        NetworkPolicyPeer {
            pod_selector: Some(LabelSelector::single(APP_LABEL, &peer.service)),
            namespace_selector: peer
                .namespace
                .as_ref()
                .map(|ns| LabelSelector::single(NAMESPACE_NAME_LABEL, ns)),
        }
    }
}

impl From<&PeerSelector> for EndpointSelector {
    fn from(peer: &PeerSelector) -> Self {
        let mut labels = BTreeMap::from([(APP_LABEL.to_string(), peer.service.clone())]);
        if let Some(ns) = &peer.namespace {
            labels.insert(CILIUM_LABEL_NAMESPACE.to_string(), ns.clone());
        }
        EndpointSelector::from_labels(labels)
    }
}
