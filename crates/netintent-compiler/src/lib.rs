//! Intent-to-NetworkPolicy compiler
//!
//! Turns a declarative [`CommunicationIntent`] ("which services may talk to
//! which, on which ports, possibly across namespaces") into a deterministic
//! default-deny + allow-exception set of Kubernetes NetworkPolicies.
//!
//! Compilation is a pure function of the intent. The canonical output order is
//! the default-deny policy, then allow-ingress policies by destination in
//! first-seen order, then allow-egress policies by source in first-seen order.
//!
//! ```text
//! IntentSpec --validate--> CommunicationIntent --generate--> [PolicyManifest]
//!                                              --generate_l7--> [CiliumNetworkPolicy]
//! ```

#![deny(missing_docs)]

pub mod connections;
mod group;
pub mod intent;
pub mod policy;
pub mod resolver;
pub mod serializer;
pub mod validate;

pub use connections::{AllowedConnections, ConnectionVerdict};
pub use intent::{CommunicationIntent, IntentSpec, RuleSpec, ServiceRule};
pub use policy::{GeneratedPolicies, PolicyCompiler};
pub use serializer::{to_json, to_structured, to_text};
pub use validate::{validate, ValidationError, ValidationResult};

use netintent_common::policy::{CiliumNetworkPolicy, NetworkPolicy};

/// One synthesized network-policy manifest
pub type PolicyManifest = NetworkPolicy;

/// Compile an intent into its full policy set, in canonical order
///
/// The intent must already be valid; the compiler does not re-validate.
pub fn generate(intent: &CommunicationIntent) -> Vec<PolicyManifest> {
    PolicyCompiler::new(intent).compile().into_manifests()
}

/// Compile an intent into the L7-aware CiliumNetworkPolicy variant
pub fn generate_l7(intent: &CommunicationIntent) -> Vec<CiliumNetworkPolicy> {
    PolicyCompiler::new(intent).compile_l7()
}
