//! Object metadata and API resource identity for generated manifests
//!
//! Every manifest netintent emits is keyed by `(kind, namespace, name)`. The
//! name is derived deterministically from the intent, so a deployer can diff
//! and apply idempotently using [`ResourceKey`] alone.

use std::collections::BTreeMap;
use std::fmt;

use kube::core::{ApiResource, GroupVersionKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// ObjectMeta - Canonical metadata for all generated resources
// =============================================================================

/// Kubernetes object metadata for generated resources.
///
/// Automatically adds the netintent management label on construction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create new metadata with the standard netintent label
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(
            crate::LABEL_MANAGED_BY.to_string(),
            crate::LABEL_MANAGED_BY_NETINTENT.to_string(),
        );
        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels,
            annotations: BTreeMap::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Copy of this metadata with the generation timestamp removed
    pub fn without_timestamps(&self) -> Self {
        let mut meta = self.clone();
        meta.annotations.remove(crate::ANNOTATION_GENERATED_AT);
        meta
    }
}

// =============================================================================
// HasApiResource Trait
// =============================================================================

/// Trait for types that have a known API group, version, and kind.
///
/// # Example
/// ```ignore
/// impl HasApiResource for NetworkPolicy {
///     const API_VERSION: &'static str = "networking.k8s.io/v1";
///     const KIND: &'static str = "NetworkPolicy";
/// }
///
/// let ar = NetworkPolicy::api_resource();
/// ```
pub trait HasApiResource {
    /// Full API version (e.g., "networking.k8s.io/v1", "v1")
    const API_VERSION: &'static str;
    /// Resource kind (e.g., "NetworkPolicy")
    const KIND: &'static str;

    /// Build an ApiResource from the type's constants.
    fn api_resource() -> ApiResource {
        build_api_resource(Self::API_VERSION, Self::KIND)
    }
}

/// Build an ApiResource from an apiVersion string and kind.
///
/// Core resources (`v1`) have an empty group.
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    };
    ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, kind))
}

// =============================================================================
// Resource keys
// =============================================================================

/// Stable identity of a generated resource
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    /// Resource kind
    pub kind: String,
    /// Resource namespace
    pub namespace: String,
    /// Resource name
    pub name: String,
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// A generated, namespaced resource with a known API type
pub trait CompiledResource: HasApiResource {
    /// Metadata of this resource
    fn metadata(&self) -> &ObjectMeta;

    /// Key used by deployers to apply and delete this resource idempotently
    fn resource_key(&self) -> ResourceKey {
        let meta = self.metadata();
        ResourceKey {
            kind: Self::KIND.to_string(),
            namespace: meta.namespace.clone(),
            name: meta.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metadata_carries_management_label() {
        let meta = ObjectMeta::new("default-deny-all", "prod");
        assert_eq!(meta.name, "default-deny-all");
        assert_eq!(meta.namespace, "prod");
        assert_eq!(
            meta.labels.get(crate::LABEL_MANAGED_BY).map(String::as_str),
            Some(crate::LABEL_MANAGED_BY_NETINTENT)
        );
        assert!(meta.annotations.is_empty());
    }

    #[test]
    fn without_timestamps_drops_only_the_generation_time() {
        let meta = ObjectMeta::new("p", "default")
            .with_annotation(crate::ANNOTATION_GENERATED_AT, "2024-01-01T00:00:00Z")
            .with_annotation(crate::ANNOTATION_DESCRIPTION, "kept");

        let stripped = meta.without_timestamps();
        assert!(!stripped
            .annotations
            .contains_key(crate::ANNOTATION_GENERATED_AT));
        assert_eq!(
            stripped.annotations.get(crate::ANNOTATION_DESCRIPTION),
            Some(&"kept".to_string())
        );
        assert_eq!(stripped.labels, meta.labels);
    }

    #[test]
    fn empty_labels_and_annotations_are_not_serialized() {
        let meta = ObjectMeta {
            name: "p".to_string(),
            namespace: "default".to_string(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("labels").is_none());
        assert!(json.get("annotations").is_none());
    }

    #[test]
    fn api_resource_splits_group_and_version() {
        let ar = build_api_resource("networking.k8s.io/v1", "NetworkPolicy");
        assert_eq!(ar.group, "networking.k8s.io");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.kind, "NetworkPolicy");
        assert_eq!(ar.api_version, "networking.k8s.io/v1");
    }

    #[test]
    fn api_resource_handles_core_group() {
        let ar = build_api_resource("v1", "ConfigMap");
        assert_eq!(ar.group, "");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.api_version, "v1");
    }

    #[test]
    fn resource_key_display() {
        let key = ResourceKey {
            kind: "NetworkPolicy".to_string(),
            namespace: "default".to_string(),
            name: "allow-ingress-to-backend".to_string(),
        };
        assert_eq!(
            key.to_string(),
            "NetworkPolicy/default/allow-ingress-to-backend"
        );
    }
}
