//! NetworkPolicy synthesis from a communication intent
//!
//! Synthesis is split into sub-modules by manifest family:
//! - [`default_deny`]: the namespace-wide deny-all baseline
//! - [`ingress`]: one allow-ingress policy per destination service
//! - [`egress`]: one allow-egress policy per source service, plus DNS
//! - [`cilium`]: the L7-aware CiliumNetworkPolicy variant
//!
//! Every synthesizer is a pure function of the intent and the compilation
//! timestamp; none depends on another's output.

mod cilium;
mod default_deny;
mod egress;
mod ingress;

use chrono::{DateTime, SecondsFormat, Utc};
use netintent_common::meta::ObjectMeta;
use netintent_common::policy::{NetworkPolicy, NetworkPolicyPort};
use netintent_common::{
    ANNOTATION_DESCRIPTION, ANNOTATION_GENERATED_AT, ANNOTATION_INTENT_DESCRIPTION,
    LABEL_POLICY_TYPE,
};
use tracing::info;

use crate::group::group_stable;
use crate::intent::{CommunicationIntent, ServiceRule};
use crate::resolver::PeerSelector;

pub use cilium::{cilium_policy_name, DEFAULT_L7_PORT};
pub use default_deny::DEFAULT_DENY_NAME;
pub use egress::{dns_egress_rule, egress_policy_name};
pub use ingress::ingress_policy_name;

// =============================================================================
// Generated Policies Container
// =============================================================================

/// All NetworkPolicies generated for one intent, by family
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedPolicies {
    /// Deny-all baseline, one per namespace
    pub default_deny: Vec<NetworkPolicy>,
    /// Allow-ingress policies, in destination first-seen order
    pub ingress: Vec<NetworkPolicy>,
    /// Allow-egress policies, in source first-seen order
    pub egress: Vec<NetworkPolicy>,
}

impl GeneratedPolicies {
    /// Check if any policies were generated
    pub fn is_empty(&self) -> bool {
        self.default_deny.is_empty() && self.ingress.is_empty() && self.egress.is_empty()
    }

    /// Total count of all generated policies
    pub fn total_count(&self) -> usize {
        self.default_deny.len() + self.ingress.len() + self.egress.len()
    }

    /// Policies in canonical order: default-deny, ingress, egress
    pub fn manifests(&self) -> impl Iterator<Item = &NetworkPolicy> {
        self.default_deny
            .iter()
            .chain(self.ingress.iter())
            .chain(self.egress.iter())
    }

    /// Consume into the canonical manifest order
    pub fn into_manifests(self) -> Vec<NetworkPolicy> {
        let mut manifests = self.default_deny;
        manifests.extend(self.ingress);
        manifests.extend(self.egress);
        manifests
    }
}

// =============================================================================
// Policy Compiler
// =============================================================================

/// Compiler turning a validated intent into NetworkPolicies
///
/// The compiler holds no mutable state. All manifests produced by one
/// compiler share its timestamp, which is the only field that differs
/// between two compilations of the same intent.
pub struct PolicyCompiler<'a> {
    intent: &'a CommunicationIntent,
    generated_at: DateTime<Utc>,
}

impl<'a> PolicyCompiler<'a> {
    /// Create a compiler stamping manifests with the current time
    pub fn new(intent: &'a CommunicationIntent) -> Self {
        Self {
            intent,
            generated_at: Utc::now(),
        }
    }

    /// Pin the generation timestamp, for reproducible output
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Compile the full default-deny + allow policy set
    pub fn compile(&self) -> GeneratedPolicies {
        let output = GeneratedPolicies {
            default_deny: vec![self.compile_default_deny(self.intent.namespace())],
            ingress: self.compile_ingress(),
            egress: self.compile_egress(),
        };

        info!(
            intent = %self.intent.name(),
            namespace = %self.intent.namespace(),
            rules = self.intent.rules().len(),
            ingress = output.ingress.len(),
            egress = output.egress.len(),
            "compiled network policies"
        );

        output
    }

    /// Metadata shared by every generated manifest
    fn metadata(
        &self,
        name: impl Into<String>,
        namespace: &str,
        policy_type: &str,
        description: impl Into<String>,
    ) -> ObjectMeta {
        let meta = ObjectMeta::new(name, namespace)
            .with_label(LABEL_POLICY_TYPE, policy_type)
            .with_annotation(ANNOTATION_DESCRIPTION, description)
            .with_annotation(
                ANNOTATION_GENERATED_AT,
                self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        match self.intent.description() {
            Some(text) => meta.with_annotation(ANNOTATION_INTENT_DESCRIPTION, text),
            None => meta,
        }
    }
}

// =============================================================================
// Rule entry helpers
// =============================================================================

/// One allow entry: a peer and the ports it may use
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PeerEntry {
    pub(crate) peer: PeerSelector,
    pub(crate) ports: Option<Vec<NetworkPolicyPort>>,
}

/// Collapse a group's rules into one entry per distinct peer, in first-seen order.
///
/// Ports of rules naming the same peer are unioned; if any of them allows all
/// ports, so does the entry.
pub(crate) fn peer_entries<F>(rules: &[&ServiceRule], peer_of: F) -> Vec<PeerEntry>
where
    F: Fn(&ServiceRule) -> PeerSelector,
{
    group_stable(rules, |rule| peer_of(*rule))
        .into_iter()
        .map(|(peer, rules)| PeerEntry {
            peer,
            ports: union_ports(&rules),
        })
        .collect()
}

fn union_ports(rules: &[&&ServiceRule]) -> Option<Vec<NetworkPolicyPort>> {
    let mut rules = rules.iter();
    let mut merged = expand_ports(rules.next()?)?;
    for rule in rules {
        for port in expand_ports(rule)? {
            if !merged.contains(&port) {
                merged.push(port);
            }
        }
    }
    Some(merged)
}

/// Expand a rule's ports x protocols, ports outer and protocols inner.
///
/// `None` when the rule has no port list, meaning all ports.
pub(crate) fn expand_ports(rule: &ServiceRule) -> Option<Vec<NetworkPolicyPort>> {
    rule.ports().map(|ports| {
        ports
            .iter()
            .flat_map(|port| {
                rule.protocols()
                    .iter()
                    .map(move |protocol| NetworkPolicyPort::new(*port, protocol.clone()))
            })
            .collect()
    })
}

/// Comma-joined service names of the given entries, first-seen order
fn joined_services(entries: &[PeerEntry]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for entry in entries {
        if !names.contains(&entry.peer.service.as_str()) {
            names.push(&entry.peer.service);
        }
    }
    names.join(",")
}
