//! End-to-end compilation scenarios
//!
//! Each test starts from an intent document as the request layer would hand it
//! over and checks the generated policy set as a whole.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use netintent_common::meta::{CompiledResource, HasApiResource};
use netintent_common::policy::{NetworkPolicy, NetworkPolicyPort, PolicyType};
use netintent_compiler::policy::dns_egress_rule;
use netintent_compiler::{
    generate, validate, AllowedConnections, CommunicationIntent, IntentSpec, PolicyCompiler,
};

fn intent_from_json(json: &str) -> CommunicationIntent {
    let spec: IntentSpec = serde_json::from_str(json).unwrap();
    CommunicationIntent::try_from(spec).unwrap()
}

fn scenario_a() -> CommunicationIntent {
    intent_from_json(
        r#"{"name": "x", "namespace": "default", "rules": [
            {"from": "frontend", "to": "backend", "ports": [8080], "protocols": ["TCP"]}
        ]}"#,
    )
}

fn names(manifests: &[NetworkPolicy]) -> Vec<&str> {
    manifests.iter().map(|m| m.metadata.name.as_str()).collect()
}

#[test]
fn story_single_rule_yields_deny_ingress_and_egress() {
    let manifests = generate(&scenario_a());
    assert_eq!(
        names(&manifests),
        vec![
            "default-deny-all",
            "allow-ingress-to-backend",
            "allow-egress-from-frontend"
        ]
    );

    let deny = &manifests[0];
    assert_eq!(deny.metadata.namespace, "default");
    assert_eq!(
        deny.spec.policy_types,
        vec![PolicyType::Ingress, PolicyType::Egress]
    );
    assert!(deny.spec.pod_selector.match_labels.is_empty());

    let ingress = &manifests[1];
    assert_eq!(ingress.spec.ingress.len(), 1);
    let entry = &ingress.spec.ingress[0];
    assert_eq!(
        entry.from[0].pod_selector.as_ref().and_then(|s| s.label("app")),
        Some("frontend")
    );
    assert_eq!(entry.ports, Some(vec![NetworkPolicyPort::new(8080, "TCP")]));

    let egress = &manifests[2];
    assert_eq!(egress.spec.egress.len(), 2);
    assert_eq!(
        egress.spec.egress[0].to[0].pod_selector.as_ref().and_then(|s| s.label("app")),
        Some("backend")
    );
    assert_eq!(
        egress.spec.egress[0].ports,
        Some(vec![NetworkPolicyPort::new(8080, "TCP")])
    );
    assert_eq!(egress.spec.egress[1], dns_egress_rule());
}

#[test]
fn story_cross_namespace_rule_selects_namespace() {
    let intent = intent_from_json(
        r#"{"name": "x", "namespace": "default", "rules": [
            {"from": "frontend", "to": "backend", "ports": [8080], "namespace": "web"}
        ]}"#,
    );
    let manifests = generate(&intent);
    let peer = &manifests[1].spec.ingress[0].from[0];
    assert_eq!(
        peer.namespace_selector.as_ref().and_then(|s| s.label("name")),
        Some("web")
    );
    // Manifests themselves stay in the intent namespace
    assert!(manifests.iter().all(|m| m.metadata.namespace == "default"));
}

#[test]
fn story_two_sources_share_one_ingress_policy() {
    let intent = intent_from_json(
        r#"{"rules": [
            {"from": "frontend", "to": "backend"},
            {"from": "auth", "to": "backend"}
        ]}"#,
    );
    let manifests = generate(&intent);
    let ingress: Vec<_> = manifests
        .iter()
        .filter(|m| m.metadata.name.starts_with("allow-ingress"))
        .collect();
    assert_eq!(ingress.len(), 1);

    let sources: Vec<_> = ingress[0]
        .spec
        .ingress
        .iter()
        .map(|e| e.from[0].pod_selector.as_ref().and_then(|s| s.label("app")))
        .collect();
    assert_eq!(sources, vec![Some("frontend"), Some("auth")]);
    assert_eq!(
        ingress[0].metadata.annotations.get("allowed-sources"),
        Some(&"frontend,auth".to_string())
    );
}

#[test]
fn story_missing_rules_fails_validation_before_generation() {
    let spec: IntentSpec = serde_json::from_str(r#"{"name": "x"}"#).unwrap();

    let result = validate(&spec);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("rules"));

    let err = CommunicationIntent::try_from(spec).unwrap_err();
    assert_eq!(err.errors(), result.errors.as_slice());
}

#[test]
fn regeneration_differs_only_in_timestamps() {
    let intent = scenario_a();
    let first = PolicyCompiler::new(&intent)
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .compile()
        .into_manifests();
    let second = PolicyCompiler::new(&intent)
        .with_timestamp(Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap())
        .compile()
        .into_manifests();

    assert_ne!(first, second);
    let strip = |ms: &[NetworkPolicy]| ms.iter().map(|m| m.without_timestamps()).collect::<Vec<_>>();
    assert_eq!(strip(&first), strip(&second));
}

#[test]
fn one_compilation_shares_one_timestamp() {
    let manifests = generate(&scenario_a());
    let stamps: HashSet<_> = manifests
        .iter()
        .map(|m| m.metadata.annotations.get("generated-at").cloned())
        .collect();
    assert_eq!(stamps.len(), 1);
    assert!(stamps.iter().all(Option::is_some));
}

fn mixed_intent() -> CommunicationIntent {
    intent_from_json(
        r#"{"name": "shop", "namespace": "prod", "rules": [
            {"from": "frontend", "to": "api", "ports": [80, 443], "protocols": ["TCP"]},
            {"from": "api", "to": "db", "ports": [5432]},
            {"from": "api", "to": "cache", "ports": [6379], "protocols": ["TCP", "UDP"]},
            {"from": "batch", "to": "db", "namespace": "jobs"},
            {"from": "frontend", "to": "cdn", "ports": [53], "protocols": ["UDP"]},
            {"from": "api", "to": "db", "ports": [5433]}
        ]}"#,
    )
}

#[test]
fn every_service_gets_exactly_one_policy_per_direction() {
    let intent = mixed_intent();
    let manifests = generate(&intent);

    for rule in intent.rules() {
        let targeting = |prefix: &str, service: &str| {
            manifests
                .iter()
                .filter(|m| m.metadata.name.starts_with(prefix))
                .filter(|m| m.spec.pod_selector.label("app") == Some(service))
                .count()
        };
        assert_eq!(targeting("allow-ingress-to-", rule.to()), 1, "{}", rule.to());
        assert_eq!(targeting("allow-egress-from-", rule.from()), 1, "{}", rule.from());
    }
}

#[test]
fn every_egress_policy_ends_with_one_dns_entry() {
    let manifests = generate(&mixed_intent());
    let egress: Vec<_> = manifests
        .iter()
        .filter(|m| m.spec.policy_types == vec![PolicyType::Egress])
        .collect();
    assert_eq!(egress.len(), 3);

    for policy in egress {
        let dns = dns_egress_rule();
        assert_eq!(policy.spec.egress.last(), Some(&dns));
        let generated_dns = policy.spec.egress.iter().filter(|e| **e == dns).count();
        assert_eq!(generated_dns, 1, "{}", policy.metadata.name);
    }
}

#[test]
fn user_rule_on_port_53_keeps_the_dns_entry() {
    let manifests = generate(&mixed_intent());
    let frontend = manifests
        .iter()
        .find(|m| m.metadata.name == "allow-egress-from-frontend")
        .unwrap();
    let entries: Vec<_> = frontend.spec.egress.iter().collect();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries[1].ports,
        Some(vec![NetworkPolicyPort::new(53, "UDP")])
    );
    assert_eq!(*entries[2], dns_egress_rule());
}

#[test]
fn namespace_selector_appears_only_across_namespaces() {
    let intent = mixed_intent();
    let manifests = generate(&intent);
    let db = manifests
        .iter()
        .find(|m| m.metadata.name == "allow-ingress-to-db")
        .unwrap();

    let selectors: Vec<_> = db
        .spec
        .ingress
        .iter()
        .map(|e| e.from[0].namespace_selector.as_ref().and_then(|s| s.label("name")))
        .collect();
    assert_eq!(selectors, vec![None, Some("jobs")]);

    // api -> db rules merge into one entry with both ports
    assert_eq!(
        db.spec.ingress[0].ports,
        Some(vec![
            NetworkPolicyPort::new(5432, "TCP"),
            NetworkPolicyPort::new(5433, "TCP")
        ])
    );
    // batch -> db has no ports: all ports allowed
    assert_eq!(db.spec.ingress[1].ports, None);
}

#[test]
fn concurrent_compilation_matches_sequential() {
    let intent = mixed_intent();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let compiler = PolicyCompiler::new(&intent).with_timestamp(at);

    let sequential = compiler.compile().into_manifests();

    let (ingress, egress) = std::thread::scope(|s| {
        let ingress = s.spawn(|| compiler.compile_ingress());
        let egress = s.spawn(|| compiler.compile_egress());
        (ingress.join().unwrap(), egress.join().unwrap())
    });
    let mut parallel = vec![compiler.compile_default_deny(intent.namespace())];
    parallel.extend(ingress);
    parallel.extend(egress);

    assert_eq!(parallel, sequential);
}

#[test]
fn allowed_connections_derive_from_generated_set() {
    let allowed = AllowedConnections::from_manifests(&generate(&mixed_intent()));
    assert_eq!(allowed.sources_for("db"), ["api", "batch"]);
    assert!(allowed.check("frontend", "api").is_allowed());
    assert!(!allowed.check("frontend", "db").is_allowed());
}

#[test]
fn manifests_convert_to_kubernetes_types() {
    for manifest in generate(&mixed_intent()) {
        let k8s = manifest.to_k8s().unwrap();
        assert_eq!(k8s.metadata.name.as_deref(), Some(manifest.metadata.name.as_str()));
        assert_eq!(k8s.metadata.namespace.as_deref(), Some("prod"));
        assert!(k8s.spec.is_some());
    }
}

#[test]
fn resource_keys_are_unique() {
    let manifests = generate(&mixed_intent());
    let keys: HashSet<_> = manifests.iter().map(|m| m.resource_key()).collect();
    assert_eq!(keys.len(), manifests.len());
    assert_eq!(NetworkPolicy::api_resource().kind, "NetworkPolicy");
}
