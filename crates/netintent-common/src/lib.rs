//! Common types for netintent: manifest types, errors, and utilities

#![deny(missing_docs)]

pub mod error;
pub mod meta;
pub mod policy;
pub mod telemetry;
pub mod yaml;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label key identifying the tool that manages a resource
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Label value for resources generated by netintent
pub const LABEL_MANAGED_BY_NETINTENT: &str = "netintent";

/// Label key identifying the kind of generated policy (default-deny, ingress, egress)
pub const LABEL_POLICY_TYPE: &str = "policy-type";

/// Label key naming the service an ingress policy protects
pub const LABEL_TARGET_SERVICE: &str = "target-service";

/// Label key naming the service an egress policy constrains
pub const LABEL_SOURCE_SERVICE: &str = "source-service";

/// Label key naming the intent a policy was generated from
pub const LABEL_INTENT: &str = "intent";

/// Pod label used to select service workloads
pub const APP_LABEL: &str = "app";

/// Namespace label used by namespace selectors for cross-namespace peers
pub const NAMESPACE_NAME_LABEL: &str = "name";

/// Cilium's reserved label carrying an endpoint's namespace
pub const CILIUM_LABEL_NAMESPACE: &str = "k8s:io.kubernetes.pod.namespace";

/// Annotation holding a human-readable policy description
pub const ANNOTATION_DESCRIPTION: &str = "description";

/// Annotation holding the generation timestamp.
///
/// This is the only field allowed to differ between two compilations of the
/// same intent.
pub const ANNOTATION_GENERATED_AT: &str = "generated-at";

/// Annotation listing the sources admitted by an ingress policy
pub const ANNOTATION_ALLOWED_SOURCES: &str = "allowed-sources";

/// Annotation listing the destinations reachable through an egress policy
pub const ANNOTATION_ALLOWED_DESTINATIONS: &str = "allowed-destinations";

/// Annotation carrying the intent's free-form description
pub const ANNOTATION_INTENT_DESCRIPTION: &str = "intent-description";

/// DNS port opened by every generated egress policy
pub const DNS_PORT: u16 = 53;
