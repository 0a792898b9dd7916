//! Allow-egress synthesis
//!
//! Rules are grouped by source. Each source gets one policy whose pod
//! selector targets it, with one egress entry per distinct destination and a
//! trailing DNS entry so the source can still resolve service names.

use netintent_common::policy::{
    LabelSelector, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyPort, NetworkPolicySpec,
    PolicyType,
};
use netintent_common::{
    ANNOTATION_ALLOWED_DESTINATIONS, APP_LABEL, DNS_PORT, LABEL_INTENT, LABEL_SOURCE_SERVICE,
};
use tracing::debug;

use super::{joined_services, peer_entries, PolicyCompiler};
use crate::group::group_stable;
use crate::intent::ServiceRule;
use crate::resolver::resolve_peer;

/// Name of the allow-egress policy constraining `source`
pub fn egress_policy_name(source: &str) -> String {
    format!("allow-egress-from-{}", source)
}

/// Egress entry allowing DNS to any destination.
///
/// Always appended last, even if a user rule already opens port 53.
pub fn dns_egress_rule() -> NetworkPolicyEgressRule {
    NetworkPolicyEgressRule {
        to: vec![],
        ports: Some(vec![
            NetworkPolicyPort::new(DNS_PORT, "UDP"),
            NetworkPolicyPort::new(DNS_PORT, "TCP"),
        ]),
    }
}

impl<'a> PolicyCompiler<'a> {
    /// Compile one allow-egress policy per source, in first-seen order
    pub fn compile_egress(&self) -> Vec<NetworkPolicy> {
        group_stable(self.intent.rules(), |rule| rule.from())
            .into_iter()
            .map(|(source, rules)| self.compile_egress_policy(source, &rules))
            .collect()
    }

    fn compile_egress_policy(&self, source: &str, rules: &[&ServiceRule]) -> NetworkPolicy {
        let namespace = self.intent.namespace();
        let entries = peer_entries(rules, |rule| {
            resolve_peer(rule.to(), rule.namespace_or(namespace), namespace)
        });

        debug!(
            source,
            destinations = entries.len(),
            "synthesizing egress policy"
        );

        let metadata = self
            .metadata(
                egress_policy_name(source),
                namespace,
                "egress",
                format!("Allow egress traffic from {}", source),
            )
            .with_label(LABEL_SOURCE_SERVICE, source)
            .with_label(LABEL_INTENT, self.intent.name())
            .with_annotation(ANNOTATION_ALLOWED_DESTINATIONS, joined_services(&entries));

        let mut egress: Vec<NetworkPolicyEgressRule> = entries
            .into_iter()
            .map(|entry| NetworkPolicyEgressRule {
                to: vec![(&entry.peer).into()],
                ports: entry.ports,
            })
            .collect();
        egress.push(dns_egress_rule());

        NetworkPolicy::new(
            metadata,
            NetworkPolicySpec {
                pod_selector: LabelSelector::single(APP_LABEL, source),
                policy_types: vec![PolicyType::Egress],
                ingress: vec![],
                egress,
            },
        )
    }
}
