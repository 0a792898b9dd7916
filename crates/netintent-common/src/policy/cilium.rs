//! Cilium CiliumNetworkPolicy types
//!
//! Types for the L7-aware policy variant. Only the ingress subset of the
//! schema is modelled, plus the HTTP rules attached to port rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::meta::{CompiledResource, HasApiResource, ObjectMeta};

/// Cilium Network Policy with optional L7 rules
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumNetworkPolicy {
    /// API version
    #[serde(default = "CiliumNetworkPolicy::api_version")]
    pub api_version: String,
    /// Kind
    #[serde(default = "CiliumNetworkPolicy::kind")]
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: CiliumNetworkPolicySpec,
}

impl HasApiResource for CiliumNetworkPolicy {
    const API_VERSION: &'static str = "cilium.io/v2";
    const KIND: &'static str = "CiliumNetworkPolicy";
}

impl CompiledResource for CiliumNetworkPolicy {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl CiliumNetworkPolicy {
    fn api_version() -> String {
        <Self as HasApiResource>::API_VERSION.to_string()
    }
    fn kind() -> String {
        <Self as HasApiResource>::KIND.to_string()
    }

    /// Create a new CiliumNetworkPolicy
    pub fn new(metadata: ObjectMeta, spec: CiliumNetworkPolicySpec) -> Self {
        Self {
            api_version: Self::api_version(),
            kind: Self::kind(),
            metadata,
            spec,
        }
    }

    /// Copy of this policy with the generation timestamp removed
    pub fn without_timestamps(&self) -> Self {
        Self {
            metadata: self.metadata.without_timestamps(),
            ..self.clone()
        }
    }
}

/// CiliumNetworkPolicy spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumNetworkPolicySpec {
    /// Endpoint selector (which pods this applies to)
    pub endpoint_selector: EndpointSelector,
    /// Ingress rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<CiliumIngressRule>,
}

/// Endpoint selector for CiliumNetworkPolicy
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSelector {
    /// Match labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

impl EndpointSelector {
    /// Create an endpoint selector from a set of labels
    pub fn from_labels(match_labels: BTreeMap<String, String>) -> Self {
        Self { match_labels }
    }
}

/// Cilium ingress rule
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CiliumIngressRule {
    /// From endpoints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_endpoints: Vec<EndpointSelector>,
    /// To ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_ports: Vec<CiliumPortRule>,
}

/// Cilium port rule with optional L7 rules
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CiliumPortRule {
    /// Ports
    pub ports: Vec<CiliumPort>,
    /// L7 rules enforced on these ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<L7Rules>,
}

/// Cilium port specification
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CiliumPort {
    /// Port number (Cilium takes ports as strings)
    pub port: String,
    /// Protocol (TCP, UDP)
    pub protocol: String,
}

/// L7 rules for a port rule
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct L7Rules {
    /// HTTP request matchers; a request is allowed if any matches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<HttpRule>,
}

impl L7Rules {
    /// Whether no L7 matcher is present
    pub fn is_empty(&self) -> bool {
        self.http.is_empty()
    }
}

/// HTTP request matcher
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpRule {
    /// HTTP method (regex), e.g. "GET"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// URL path (regex), e.g. "/api/v1/.*"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Host header (regex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Required headers, as "Name: value" strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
}
