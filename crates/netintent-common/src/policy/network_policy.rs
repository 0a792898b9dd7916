//! Kubernetes NetworkPolicy types
//!
//! A value-typed rendition of `networking.k8s.io/v1` NetworkPolicy. Field
//! order and naming follow the upstream schema so the serialized form can be
//! applied as-is; [`NetworkPolicy::to_k8s`] converts into the k8s-openapi type
//! for typed API calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::meta::{CompiledResource, HasApiResource, ObjectMeta};
use crate::{Error, Result};

/// Kubernetes NetworkPolicy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    /// API version
    #[serde(default = "NetworkPolicy::api_version")]
    pub api_version: String,
    /// Kind
    #[serde(default = "NetworkPolicy::kind")]
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: NetworkPolicySpec,
}

impl HasApiResource for NetworkPolicy {
    const API_VERSION: &'static str = "networking.k8s.io/v1";
    const KIND: &'static str = "NetworkPolicy";
}

impl CompiledResource for NetworkPolicy {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl NetworkPolicy {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new NetworkPolicy
    pub fn new(metadata: ObjectMeta, spec: NetworkPolicySpec) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec,
        }
    }

    /// Copy of this policy with the generation timestamp removed.
    ///
    /// Two compilations of the same intent are equal after this.
    pub fn without_timestamps(&self) -> Self {
        Self {
            metadata: self.metadata.without_timestamps(),
            ..self.clone()
        }
    }

    /// Convert into the k8s-openapi NetworkPolicy type
    pub fn to_k8s(&self) -> Result<k8s_openapi::api::networking::v1::NetworkPolicy> {
        let value = serde_json::to_value(self)
            .map_err(|e| Error::serialization_for(Self::KIND, e.to_string()))?;
        serde_json::from_value(value)
            .map_err(|e| Error::serialization_for(Self::KIND, e.to_string()))
    }
}

/// NetworkPolicy spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    /// Pods this policy applies to; empty selects every pod in the namespace
    pub pod_selector: LabelSelector,
    /// Directions this policy governs
    pub policy_types: Vec<PolicyType>,
    /// Ingress allow rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<NetworkPolicyIngressRule>,
    /// Egress allow rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub egress: Vec<NetworkPolicyEgressRule>,
}

/// Traffic direction governed by a NetworkPolicy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PolicyType {
    /// Inbound traffic
    Ingress,
    /// Outbound traffic
    Egress,
}

/// Label selector (matchLabels only)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    /// Match labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Create a selector from a set of labels
    pub fn from_labels(match_labels: BTreeMap<String, String>) -> Self {
        Self { match_labels }
    }

    /// Selector matching a single label
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            match_labels: BTreeMap::from([(key.into(), value.into())]),
        }
    }

    /// Value of the given label, if selected on
    pub fn label(&self, key: &str) -> Option<&str> {
        self.match_labels.get(key).map(String::as_str)
    }
}

/// A peer (pods, optionally in other namespaces) a rule admits
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPeer {
    /// Pod selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
    /// Namespace selector; absent means the policy's own namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
}

/// Ingress rule entry
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkPolicyIngressRule {
    /// Allowed sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<NetworkPolicyPeer>,
    /// Allowed ports; `None` allows all ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<NetworkPolicyPort>>,
}

/// Egress rule entry
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkPolicyEgressRule {
    /// Allowed destinations; empty allows any destination
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<NetworkPolicyPeer>,
    /// Allowed ports; `None` allows all ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<NetworkPolicyPort>>,
}

/// Port and protocol pair
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NetworkPolicyPort {
    /// Port number
    pub port: u16,
    /// Protocol (TCP, UDP, SCTP); passed through verbatim
    pub protocol: String,
}

impl NetworkPolicyPort {
    /// Create a port entry
    pub fn new(port: u16, protocol: impl Into<String>) -> Self {
        Self {
            port,
            protocol: protocol.into(),
        }
    }
}
