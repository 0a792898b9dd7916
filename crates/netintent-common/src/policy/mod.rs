//! Policy type definitions for Kubernetes network policies
//!
//! Types for generating:
//! - Kubernetes NetworkPolicy (L3/L4 default-deny and allow rules)
//! - Cilium CiliumNetworkPolicy (L7-aware ingress rules)
//!
//! All policy types implement [`HasApiResource`](crate::meta::HasApiResource)
//! for consistent API version and kind handling.

pub mod cilium;
pub mod network_policy;

pub use cilium::{
    CiliumIngressRule, CiliumNetworkPolicy, CiliumNetworkPolicySpec, CiliumPort, CiliumPortRule,
    EndpointSelector, HttpRule, L7Rules,
};
pub use network_policy::{
    LabelSelector, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule,
    NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec, PolicyType,
};
