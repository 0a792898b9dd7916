//! Allow-ingress synthesis
//!
//! Rules are grouped by destination. Each destination gets one policy whose
//! pod selector targets it, with one ingress entry per distinct source.

use netintent_common::policy::{
    LabelSelector, NetworkPolicy, NetworkPolicyIngressRule, NetworkPolicySpec, PolicyType,
};
use netintent_common::{ANNOTATION_ALLOWED_SOURCES, APP_LABEL, LABEL_INTENT, LABEL_TARGET_SERVICE};
use tracing::debug;

use super::{joined_services, peer_entries, PolicyCompiler};
use crate::group::group_stable;
use crate::intent::ServiceRule;
use crate::resolver::resolve_peer;

/// Name of the allow-ingress policy protecting `destination`
pub fn ingress_policy_name(destination: &str) -> String {
    format!("allow-ingress-to-{}", destination)
}

impl<'a> PolicyCompiler<'a> {
    /// Compile one allow-ingress policy per destination, in first-seen order
    pub fn compile_ingress(&self) -> Vec<NetworkPolicy> {
        group_stable(self.intent.rules(), |rule| rule.to())
            .into_iter()
            .map(|(destination, rules)| self.compile_ingress_policy(destination, &rules))
            .collect()
    }

    fn compile_ingress_policy(&self, destination: &str, rules: &[&ServiceRule]) -> NetworkPolicy {
        let namespace = self.intent.namespace();
        let entries = peer_entries(rules, |rule| {
            resolve_peer(rule.from(), rule.namespace_or(namespace), namespace)
        });

        debug!(
            destination,
            sources = entries.len(),
            "synthesizing ingress policy"
        );

        let metadata = self
            .metadata(
                ingress_policy_name(destination),
                namespace,
                "ingress",
                format!("Allow ingress traffic to {}", destination),
            )
            .with_label(LABEL_TARGET_SERVICE, destination)
            .with_label(LABEL_INTENT, self.intent.name())
            .with_annotation(ANNOTATION_ALLOWED_SOURCES, joined_services(&entries));

        let ingress = entries
            .into_iter()
            .map(|entry| NetworkPolicyIngressRule {
                from: vec![(&entry.peer).into()],
                ports: entry.ports,
            })
            .collect();

        NetworkPolicy::new(
            metadata,
            NetworkPolicySpec {
                pod_selector: LabelSelector::single(APP_LABEL, destination),
                policy_types: vec![PolicyType::Ingress],
                ingress,
                egress: vec![],
            },
        )
    }
}
