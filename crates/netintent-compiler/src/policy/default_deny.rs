//! Default-deny baseline
//!
//! An empty pod selector matches every pod in the namespace; listing both
//! policy types with no allow rules blocks all traffic not explicitly
//! admitted by another policy.

use netintent_common::policy::{LabelSelector, NetworkPolicy, NetworkPolicySpec, PolicyType};
use tracing::debug;

use super::PolicyCompiler;

/// Name of the deny-all policy
pub const DEFAULT_DENY_NAME: &str = "default-deny-all";

impl<'a> PolicyCompiler<'a> {
    /// Compile the deny-all ingress and egress policy for a namespace
    pub fn compile_default_deny(&self, namespace: &str) -> NetworkPolicy {
        debug!(namespace, "synthesizing default-deny policy");

        let metadata = self.metadata(
            DEFAULT_DENY_NAME,
            namespace,
            "default-deny",
            "Default deny all ingress and egress traffic",
        );

        NetworkPolicy::new(
            metadata,
            NetworkPolicySpec {
                pod_selector: LabelSelector::default(),
                policy_types: vec![PolicyType::Ingress, PolicyType::Egress],
                ingress: vec![],
                egress: vec![],
            },
        )
    }
}
