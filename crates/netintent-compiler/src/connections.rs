//! Allowed-connections projection
//!
//! Reduces a generated policy set to `destination -> [source]`, the only view
//! a drift classifier needs, and answers whether one observed connection is
//! covered by it. Read from the typed manifests; nothing is re-parsed.

use netintent_common::APP_LABEL;
use serde::Serialize;

use crate::PolicyManifest;

/// Outcome of checking one connection against the allowed set
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ConnectionVerdict {
    /// The connection is covered by an allow-ingress policy
    Allowed {
        /// Human-readable explanation
        reason: String,
    },
    /// No generated policy admits the connection
    NotAllowed {
        /// Human-readable explanation
        reason: String,
    },
}

impl ConnectionVerdict {
    /// Whether the connection is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Explanation attached to the verdict
    pub fn reason(&self) -> &str {
        match self {
            Self::Allowed { reason } | Self::NotAllowed { reason } => reason,
        }
    }
}

/// Destination service -> allowed source services, both in first-seen order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AllowedConnections {
    entries: Vec<(String, Vec<String>)>,
}

impl AllowedConnections {
    /// Project the allow-ingress manifests of a generated set.
    ///
    /// Manifests without an `app` pod selector (the default-deny baseline) and
    /// egress-only manifests contribute nothing.
    pub fn from_manifests(manifests: &[PolicyManifest]) -> Self {
        let mut allowed = Self::default();
        for manifest in manifests {
            let Some(destination) = manifest.spec.pod_selector.label(APP_LABEL) else {
                continue;
            };
            for rule in &manifest.spec.ingress {
                let sources = rule
                    .from
                    .iter()
                    .filter_map(|peer| peer.pod_selector.as_ref())
                    .filter_map(|selector| selector.label(APP_LABEL));
                for source in sources {
                    allowed.insert(destination, source);
                }
            }
        }
        allowed
    }

    fn insert(&mut self, destination: &str, source: &str) {
        let index = match self.entries.iter().position(|(d, _)| d == destination) {
            Some(index) => index,
            None => {
                self.entries.push((destination.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let sources = &mut self.entries[index].1;
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_string());
        }
    }

    /// Sources allowed to reach `destination`; empty when it is unknown
    pub fn sources_for(&self, destination: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(d, _)| d == destination)
            .map(|(_, sources)| sources.as_slice())
            .unwrap_or_default()
    }

    /// Destinations with at least one allowed source, first-seen order
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(d, _)| d.as_str())
    }

    /// Whether no connection is allowed at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify a connection from `source` to `destination`
    pub fn check(&self, source: &str, destination: &str) -> ConnectionVerdict {
        if self.sources_for(destination).iter().any(|s| s == source) {
            ConnectionVerdict::Allowed {
                reason: format!(
                    "Connection from {} to {} is explicitly allowed",
                    source, destination
                ),
            }
        } else {
            ConnectionVerdict::NotAllowed {
                reason: format!(
                    "Connection from {} to {} not in allowed list",
                    source, destination
                ),
            }
        }
    }
}
