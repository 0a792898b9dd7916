//! L7-aware policy variant: CiliumNetworkPolicy
//!
//! Shares the resolver and grouping discipline of the baseline synthesizers
//! but emits Cilium's richer shape: `endpointSelector`, `fromEndpoints` and
//! `toPorts` carrying optional HTTP rules. Baseline manifests are unaffected.
//!
//! Each rule in a destination group keeps its own ingress entry, since rules
//! naming the same source may carry different L7 matchers.

use netintent_common::policy::{
    CiliumIngressRule, CiliumNetworkPolicy, CiliumNetworkPolicySpec, CiliumPort, CiliumPortRule,
    EndpointSelector,
};
use netintent_common::{APP_LABEL, LABEL_INTENT, LABEL_TARGET_SERVICE};
use std::collections::BTreeMap;
use tracing::debug;

use super::{expand_ports, PolicyCompiler};
use crate::group::group_stable;
use crate::intent::{ServiceRule, DEFAULT_PROTOCOL};
use crate::resolver::resolve_peer;

/// Port assumed for L7 rules on a rule that lists no ports
pub const DEFAULT_L7_PORT: u16 = 80;

/// Name of the Cilium policy protecting `destination`
pub fn cilium_policy_name(destination: &str) -> String {
    format!("cilium-allow-ingress-to-{}", destination)
}

impl<'a> PolicyCompiler<'a> {
    /// Compile one CiliumNetworkPolicy per destination, in first-seen order
    pub fn compile_l7(&self) -> Vec<CiliumNetworkPolicy> {
        group_stable(self.intent.rules(), |rule| rule.to())
            .into_iter()
            .map(|(destination, rules)| self.compile_cilium_policy(destination, &rules))
            .collect()
    }

    fn compile_cilium_policy(
        &self,
        destination: &str,
        rules: &[&ServiceRule],
    ) -> CiliumNetworkPolicy {
        let namespace = self.intent.namespace();

        debug!(destination, rules = rules.len(), "synthesizing cilium policy");

        let ingress = rules
            .iter()
            .map(|rule| {
                let peer = resolve_peer(rule.from(), rule.namespace_or(namespace), namespace);
                CiliumIngressRule {
                    from_endpoints: vec![(&peer).into()],
                    to_ports: Self::cilium_port_rules(rule),
                }
            })
            .collect();

        let metadata = self
            .metadata(
                cilium_policy_name(destination),
                namespace,
                "l7-ingress",
                format!("Allow L7-filtered ingress traffic to {}", destination),
            )
            .with_label(LABEL_TARGET_SERVICE, destination)
            .with_label(LABEL_INTENT, self.intent.name());

        CiliumNetworkPolicy::new(
            metadata,
            CiliumNetworkPolicySpec {
                endpoint_selector: EndpointSelector::from_labels(BTreeMap::from([(
                    APP_LABEL.to_string(),
                    destination.to_string(),
                )])),
                ingress,
            },
        )
    }

    /// Port rules for one rule: its ports x protocols with its L7 rules attached.
    ///
    /// L7 rules on a rule without ports apply to port 80/TCP.
    fn cilium_port_rules(rule: &ServiceRule) -> Vec<CiliumPortRule> {
        let l7 = rule.l7_rules().cloned();
        let ports = match expand_ports(rule) {
            Some(ports) => ports
                .into_iter()
                .map(|p| CiliumPort {
                    port: p.port.to_string(),
                    protocol: p.protocol,
                })
                .collect(),
            None if l7.is_some() => vec![CiliumPort {
                port: DEFAULT_L7_PORT.to_string(),
                protocol: DEFAULT_PROTOCOL.to_string(),
            }],
            None => return vec![],
        };
        vec![CiliumPortRule { ports, rules: l7 }]
    }
}
