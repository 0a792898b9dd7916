//! Intent model
//!
//! Two layers:
//! - [`IntentSpec`] / [`RuleSpec`]: the loosely-typed document handed over by
//!   the request layer. Every field is optional so the validator can report
//!   what is missing instead of failing at deserialization.
//! - [`CommunicationIntent`] / [`ServiceRule`]: the validated, immutable
//!   model the compiler consumes. Defaults are applied once, on conversion.

use netintent_common::policy::L7Rules;
use serde::{Deserialize, Serialize};

use crate::validate::{validate, ValidationError};

/// Namespace used when an intent does not name one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Intent name used when an intent does not name itself
pub const DEFAULT_INTENT_NAME: &str = "generated";

/// Protocol assumed when a rule lists none
pub const DEFAULT_PROTOCOL: &str = "TCP";

// =============================================================================
// Input document
// =============================================================================

/// Intent document as received from the request layer
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct IntentSpec {
    /// Name of the rule set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Namespace the generated policies live in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Communication rules; `None` (field absent) is distinct from empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RuleSpec>>,
}

/// One source -> destination rule as received from the request layer
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleSpec {
    /// Source service
    #[serde(default, alias = "from_service", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Destination service
    #[serde(default, alias = "to_service", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Destination ports; absent or empty means all ports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<u16>>,
    /// Protocols; absent or empty means TCP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<String>>,
    /// Namespace of the peer; defaults to the intent namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// L7 rules, only used by the Cilium variant
    #[serde(
        default,
        alias = "l7Rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub l7_rules: Option<L7Rules>,
}

// =============================================================================
// Validated model
// =============================================================================

/// Validated statement of which services may talk to which
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommunicationIntent {
    name: String,
    namespace: String,
    description: Option<String>,
    rules: Vec<ServiceRule>,
}

impl CommunicationIntent {
    /// Create an intent from already-valid rules
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        rules: Vec<ServiceRule>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            description: None,
            rules,
        }
    }

    /// Attach a description, carried into manifest annotations
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Name of the rule set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace the generated policies live in
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Free-form description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[ServiceRule] {
        &self.rules
    }
}

impl TryFrom<IntentSpec> for CommunicationIntent {
    type Error = ValidationError;

    /// Validate and convert. Warnings do not block conversion.
    fn try_from(spec: IntentSpec) -> Result<Self, Self::Error> {
        let result = validate(&spec);
        if !result.valid {
            return Err(ValidationError::new(result.errors));
        }

        let namespace = spec
            .namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let name = spec
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_INTENT_NAME.to_string());

        let rules = spec
            .rules
            .unwrap_or_default()
            .into_iter()
            .filter_map(ServiceRule::from_spec)
            .collect();

        let mut intent = CommunicationIntent::new(name, namespace, rules);
        if let Some(description) = spec.description {
            intent = intent.with_description(description);
        }
        Ok(intent)
    }
}

/// One validated source -> destination communication rule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceRule {
    from: String,
    to: String,
    ports: Option<Vec<u16>>,
    protocols: Vec<String>,
    namespace: Option<String>,
    l7_rules: Option<L7Rules>,
}

impl ServiceRule {
    /// Rule allowing `from` to reach `to` on all ports over TCP
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ports: None,
            protocols: vec![DEFAULT_PROTOCOL.to_string()],
            namespace: None,
            l7_rules: None,
        }
    }

    /// Restrict to the given ports; an empty list means all ports
    pub fn with_ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        let ports: Vec<u16> = ports.into_iter().collect();
        self.ports = (!ports.is_empty()).then_some(ports);
        self
    }

    /// Use the given protocols; an empty list falls back to TCP
    pub fn with_protocols<S: Into<String>>(mut self, protocols: impl IntoIterator<Item = S>) -> Self {
        let protocols: Vec<String> = protocols.into_iter().map(Into::into).collect();
        self.protocols = if protocols.is_empty() {
            vec![DEFAULT_PROTOCOL.to_string()]
        } else {
            protocols
        };
        self
    }

    /// Place the peer in an explicit namespace
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.trim().is_empty()).then_some(namespace);
        self
    }

    /// Attach L7 rules for the Cilium variant
    pub fn with_l7_rules(mut self, rules: L7Rules) -> Self {
        self.l7_rules = (!rules.is_empty()).then_some(rules);
        self
    }

    /// Convert a validated rule spec; `None` if a required field is missing
    fn from_spec(spec: RuleSpec) -> Option<Self> {
        let from = spec.from.filter(|s| !s.trim().is_empty())?;
        let to = spec.to.filter(|s| !s.trim().is_empty())?;
        let mut rule = ServiceRule::new(from, to)
            .with_ports(spec.ports.unwrap_or_default())
            .with_protocols(spec.protocols.unwrap_or_default());
        if let Some(namespace) = spec.namespace {
            rule = rule.in_namespace(namespace);
        }
        if let Some(l7) = spec.l7_rules {
            rule = rule.with_l7_rules(l7);
        }
        Some(rule)
    }

    /// Source service
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Destination service
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Ports, or `None` for all ports
    pub fn ports(&self) -> Option<&[u16]> {
        self.ports.as_deref()
    }

    /// Protocols, never empty
    pub fn protocols(&self) -> &[String] {
        &self.protocols
    }

    /// Declared peer namespace, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Peer namespace, falling back to the intent namespace
    pub fn namespace_or<'a>(&'a self, intent_namespace: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(intent_namespace)
    }

    /// L7 rules, if any
    pub fn l7_rules(&self) -> Option<&L7Rules> {
        self.l7_rules.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netintent_common::policy::HttpRule;

    fn rule_spec(from: &str, to: &str) -> RuleSpec {
        RuleSpec {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn conversion_applies_defaults() {
        let spec = IntentSpec {
            rules: Some(vec![rule_spec("frontend", "backend")]),
            ..Default::default()
        };
        let intent = CommunicationIntent::try_from(spec).unwrap();
        assert_eq!(intent.name(), DEFAULT_INTENT_NAME);
        assert_eq!(intent.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(intent.description(), None);

        let rule = &intent.rules()[0];
        assert_eq!(rule.ports(), None);
        assert_eq!(rule.protocols(), ["TCP".to_string()]);
        assert_eq!(rule.namespace(), None);
        assert_eq!(rule.namespace_or("default"), "default");
    }

    #[test]
    fn empty_ports_and_protocols_are_treated_as_absent() {
        let spec = IntentSpec {
            rules: Some(vec![RuleSpec {
                ports: Some(vec![]),
                protocols: Some(vec![]),
                namespace: Some(String::new()),
                ..rule_spec("a", "b")
            }]),
            ..Default::default()
        };
        let intent = CommunicationIntent::try_from(spec).unwrap();
        let rule = &intent.rules()[0];
        assert_eq!(rule.ports(), None);
        assert_eq!(rule.protocols(), ["TCP".to_string()]);
        assert_eq!(rule.namespace(), None);
    }

    #[test]
    fn conversion_fails_with_every_error() {
        let spec = IntentSpec {
            rules: Some(vec![
                RuleSpec {
                    to: Some("backend".to_string()),
                    ..Default::default()
                },
                RuleSpec {
                    from: Some("frontend".to_string()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let err = CommunicationIntent::try_from(spec).unwrap_err();
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn conversion_keeps_rule_order_and_fields() {
        let spec = IntentSpec {
            name: Some("shop".to_string()),
            namespace: Some("prod".to_string()),
            description: Some("checkout flow".to_string()),
            rules: Some(vec![
                RuleSpec {
                    ports: Some(vec![80, 443]),
                    protocols: Some(vec!["TCP".to_string(), "UDP".to_string()]),
                    namespace: Some("web".to_string()),
                    ..rule_spec("frontend", "backend")
                },
                rule_spec("backend", "db"),
            ]),
        };
        let intent = CommunicationIntent::try_from(spec).unwrap();
        assert_eq!(intent.name(), "shop");
        assert_eq!(intent.namespace(), "prod");
        assert_eq!(intent.description(), Some("checkout flow"));
        assert_eq!(intent.rules().len(), 2);

        let first = &intent.rules()[0];
        assert_eq!(first.from(), "frontend");
        assert_eq!(first.to(), "backend");
        assert_eq!(first.ports(), Some(&[80, 443][..]));
        assert_eq!(first.protocols(), ["TCP".to_string(), "UDP".to_string()]);
        assert_eq!(first.namespace_or("prod"), "web");
        assert_eq!(intent.rules()[1].to(), "db");
    }

    #[test]
    fn deserializes_api_field_aliases() {
        let json = serde_json::json!({
            "name": "x",
            "rules": [{
                "from_service": "frontend",
                "to_service": "backend",
                "ports": [8080],
                "l7Rules": {"http": [{"method": "GET", "path": "/"}]}
            }]
        });
        let spec: IntentSpec = serde_json::from_value(json).unwrap();
        let rule = &spec.rules.as_ref().unwrap()[0];
        assert_eq!(rule.from.as_deref(), Some("frontend"));
        assert_eq!(rule.to.as_deref(), Some("backend"));
        assert_eq!(
            rule.l7_rules.as_ref().unwrap().http[0].method.as_deref(),
            Some("GET")
        );
    }

    #[test]
    fn missing_rules_stays_distinct_from_empty_rules() {
        let missing: IntentSpec = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(missing.rules, None);

        let empty: IntentSpec = serde_json::from_str(r#"{"name": "x", "rules": []}"#).unwrap();
        assert_eq!(empty.rules, Some(vec![]));
    }

    #[test]
    fn builder_normalizes_optional_fields() {
        let rule = ServiceRule::new("a", "b")
            .with_ports([])
            .with_protocols(Vec::<String>::new())
            .in_namespace("")
            .with_l7_rules(L7Rules::default());
        assert_eq!(rule, ServiceRule::new("a", "b"));

        let rule = ServiceRule::new("a", "b").with_l7_rules(L7Rules {
            http: vec![HttpRule {
                method: Some("GET".to_string()),
                ..Default::default()
            }],
        });
        assert!(rule.l7_rules().is_some());
    }

    #[test]
    fn blank_rule_namespace_falls_back_to_intent_namespace() {
        let rule = ServiceRule::new("a", "b").in_namespace("  ");
        assert_eq!(rule.namespace(), None);
        assert_eq!(rule.namespace_or("prod"), "prod");

        let spec = IntentSpec {
            namespace: Some("prod".to_string()),
            rules: Some(vec![RuleSpec {
                from: Some("a".to_string()),
                to: Some("b".to_string()),
                namespace: Some("\t ".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let intent = CommunicationIntent::try_from(spec).unwrap();
        assert_eq!(intent.rules()[0].namespace(), None);
    }

    #[test]
    fn empty_description_is_dropped() {
        let intent = CommunicationIntent::new("x", "default", vec![]).with_description("");
        assert_eq!(intent.description(), None);
    }
}
