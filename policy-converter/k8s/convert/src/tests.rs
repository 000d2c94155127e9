use super::*;
use crate::{
    calico::{Action, EntityRule, IpNet, PolicyType, Port, Protocol, Rule, LABEL_ORCHESTRATOR},
    k8s::{
        IPBlock, IntOrString, LabelSelector, LabelSelectorRequirement, NetworkPolicyEgressRule,
        NetworkPolicyIngressRule, NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec,
        ObjectMeta,
    },
};
use maplit::btreemap;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::{BTreeMap, BTreeSet};

#[test]
fn namespace_profile() {
    let ns = mk_namespace("billing", btreemap! { "team".to_string() => "finance".to_string() });
    let profile = Converter::new().namespace_to_profile(&ns);

    assert_eq!(profile.metadata.name, "kns.billing");
    assert_eq!(
        profile.labels_to_apply,
        btreemap! { "pcns.team".to_string() => "finance".to_string() }
    );
    assert_eq!(profile.ingress_rules, vec![Rule::allow()]);
    assert_eq!(profile.egress_rules, vec![Rule::allow()]);
    assert_eq!(
        profile.ingress_rules[0],
        Rule {
            action: Action::Allow,
            protocol: None,
            source: EntityRule::default(),
            destination: EntityRule::default(),
        }
    );
}

#[test]
fn allow_web_ingress_on_port_80() {
    let np = mk_policy(
        "ns-0",
        "allow-web",
        mk_selector(&[("app", "web")]),
        vec![NetworkPolicyIngressRule {
            from: None,
            ports: Some(vec![tcp_port(80)]),
        }],
        vec![],
        None,
    );

    let policy = Converter::new().network_policy(&np).unwrap();
    assert_eq!(policy.metadata.name, "knp.default.allow-web");
    assert_eq!(policy.metadata.namespace.as_deref(), Some("ns-0"));
    assert_eq!(policy.order, 1000.0);
    assert_eq!(
        policy.selector,
        "projectcalico.org/orchestrator == 'k8s' && app == 'web'"
    );
    assert_eq!(
        policy.ingress_rules,
        vec![Rule {
            action: Action::Allow,
            protocol: Some(Protocol::Tcp),
            source: EntityRule::default(),
            destination: EntityRule {
                ports: vec![Port::Number(80)],
                ..EntityRule::default()
            },
        }]
    );
    assert!(policy.egress_rules.is_empty());
    assert_eq!(policy.types, [PolicyType::Ingress].into_iter().collect::<BTreeSet<_>>());
}

#[test]
fn empty_policy_selects_all_kubernetes_endpoints() {
    let np = mk_policy(
        "ns-0",
        "deny-all",
        LabelSelector::default(),
        vec![],
        vec![],
        Some(&["Ingress", "Egress"]),
    );
    let policy = Converter::new().network_policy(&np).unwrap();
    assert_eq!(policy.selector, "projectcalico.org/orchestrator == 'k8s'");
    assert!(policy.ingress_rules.is_empty());
    assert!(policy.egress_rules.is_empty());
    assert_eq!(
        policy.types,
        [PolicyType::Ingress, PolicyType::Egress].into_iter().collect::<BTreeSet<_>>()
    );
}

#[rstest]
#[case(0, 0, 1)]
#[case(0, 3, 3)]
#[case(2, 0, 2)]
#[case(1, 1, 1)]
#[case(2, 3, 6)]
fn expands_peers_and_ports(#[case] peers: usize, #[case] ports: usize, #[case] rules: usize) {
    let peers = (0..peers)
        .map(|i| mk_pod_peer(&[("app", format!("app-{}", i).as_str())]))
        .collect::<Vec<_>>();
    let ports = (0..ports)
        .map(|i| tcp_port(8080 + i as i32))
        .collect::<Vec<_>>();

    for direction in [Direction::Ingress, Direction::Egress] {
        let expanded = Converter::new()
            .expand_rules(&peers, &ports, direction)
            .unwrap();
        assert_eq!(expanded.len(), rules);
        assert!(expanded.iter().all(|r| r.action == Action::Allow));
    }
}

#[test]
fn ports_are_the_outer_loop() {
    let peers = vec![mk_pod_peer(&[("app", "a")]), mk_pod_peer(&[("app", "b")])];
    let ports = vec![tcp_port(80), tcp_port(443)];
    let rules = Converter::new()
        .expand_rules(&peers, &ports, Direction::Ingress)
        .unwrap();

    let pairs = rules
        .iter()
        .map(|r| (r.destination.ports[0].to_string(), r.source.selector.clone()))
        .collect::<Vec<_>>();
    let a = "projectcalico.org/orchestrator == 'k8s' && app == 'a'".to_string();
    let b = "projectcalico.org/orchestrator == 'k8s' && app == 'b'".to_string();
    assert_eq!(
        pairs,
        vec![
            ("80".to_string(), a.clone()),
            ("80".to_string(), b.clone()),
            ("443".to_string(), a),
            ("443".to_string(), b),
        ]
    );
}

#[test]
fn egress_rules_place_peers_in_destination() {
    let np = mk_policy(
        "ns-0",
        "to-dns",
        LabelSelector::default(),
        vec![],
        vec![NetworkPolicyEgressRule {
            to: Some(vec![NetworkPolicyPeer {
                namespace_selector: Some(mk_selector(&[("name", "kube-system")])),
                ..Default::default()
            }]),
            ports: Some(vec![NetworkPolicyPort {
                port: Some(IntOrString::Int(53)),
                protocol: Some("UDP".to_string()),
                ..Default::default()
            }]),
        }],
        Some(&["Egress"]),
    );

    let policy = Converter::new().network_policy(&np).unwrap();
    assert!(policy.ingress_rules.is_empty());
    assert_eq!(
        policy.egress_rules,
        vec![Rule {
            action: Action::Allow,
            protocol: Some(Protocol::Udp),
            source: EntityRule::default(),
            destination: EntityRule {
                selector: "projectcalico.org/orchestrator == 'k8s'".to_string(),
                namespace_selector: "name == 'kube-system'".to_string(),
                ports: vec![Port::Number(53)],
                ..EntityRule::default()
            },
        }]
    );
    assert_eq!(policy.types, [PolicyType::Egress].into_iter().collect::<BTreeSet<_>>());
}

#[test]
fn ingress_before_egress() {
    let np = mk_policy(
        "ns-0",
        "both",
        LabelSelector::default(),
        vec![
            NetworkPolicyIngressRule {
                from: Some(vec![mk_pod_peer(&[("app", "a")])]),
                ports: None,
            },
            NetworkPolicyIngressRule {
                from: Some(vec![mk_pod_peer(&[("app", "b")])]),
                ports: None,
            },
        ],
        vec![NetworkPolicyEgressRule {
            to: Some(vec![mk_ip_block("10.0.0.0/8", &["10.1.0.0/16"])]),
            ports: None,
        }],
        Some(&["Ingress", "Egress"]),
    );

    let policy = Converter::new().network_policy(&np).unwrap();
    assert_eq!(
        policy
            .ingress_rules
            .iter()
            .map(|r| r.source.selector.as_str())
            .collect::<Vec<_>>(),
        vec![
            "projectcalico.org/orchestrator == 'k8s' && app == 'a'",
            "projectcalico.org/orchestrator == 'k8s' && app == 'b'",
        ]
    );
    assert_eq!(
        policy.egress_rules,
        vec![Rule {
            action: Action::Allow,
            protocol: None,
            source: EntityRule::default(),
            destination: EntityRule {
                nets: vec!["10.0.0.0/8".parse::<IpNet>().unwrap()],
                not_nets: vec!["10.1.0.0/16".parse::<IpNet>().unwrap()],
                ..EntityRule::default()
            },
        }]
    );
}

#[test]
fn malformed_peer_fails_policy() {
    let np = mk_policy(
        "ns-0",
        "bad-block",
        LabelSelector::default(),
        vec![NetworkPolicyIngressRule {
            from: Some(vec![
                mk_pod_peer(&[("app", "a")]),
                mk_ip_block("10.0.0.0/99", &[]),
            ]),
            ports: Some(vec![tcp_port(80)]),
        }],
        vec![],
        None,
    );

    assert_eq!(
        Converter::new().network_policy(&np),
        Err(Error::InvalidCidr("10.0.0.0/99".to_string()))
    );
}

#[test]
fn malformed_peer_may_be_unrestricted() {
    let np = mk_policy(
        "ns-0",
        "bad-block",
        LabelSelector::default(),
        vec![NetworkPolicyIngressRule {
            from: Some(vec![
                mk_pod_peer(&[("app", "a")]),
                mk_ip_block("10.0.0.0/99", &[]),
            ]),
            ports: Some(vec![tcp_port(80)]),
        }],
        vec![],
        None,
    );

    let policy = Converter::new()
        .with_malformed_peers(MalformedPeers::Unrestricted)
        .network_policy(&np)
        .unwrap();
    assert_eq!(policy.ingress_rules.len(), 2);
    assert_eq!(policy.ingress_rules[1].source, EntityRule::default());
    assert_eq!(policy.ingress_rules[1].destination.ports, vec![Port::Number(80)]);
}

#[test]
fn malformed_port_fails_policy_despite_peer_tolerance() {
    let np = mk_policy(
        "ns-0",
        "bad-port",
        LabelSelector::default(),
        vec![],
        vec![NetworkPolicyEgressRule {
            to: None,
            ports: Some(vec![tcp_port(80), tcp_port(65536)]),
        }],
        Some(&["Egress"]),
    );

    assert!(matches!(
        Converter::new()
            .with_malformed_peers(MalformedPeers::Unrestricted)
            .network_policy(&np),
        Err(Error::InvalidPort(_))
    ));
}

#[test]
fn invalid_selector_operator_fails_policy() {
    let np = mk_policy(
        "ns-0",
        "bad-selector",
        LabelSelector {
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: "tier".to_string(),
                operator: "Near".to_string(),
                values: None,
            }]),
            ..Default::default()
        },
        vec![],
        vec![],
        None,
    );
    assert!(matches!(
        Converter::new().network_policy(&np),
        Err(Error::InvalidSelector(_))
    ));
}

#[test]
fn policy_requires_name_and_namespace() {
    let mut np = mk_policy("ns-0", "p", LabelSelector::default(), vec![], vec![], None);
    np.metadata.namespace = None;
    assert_eq!(
        Converter::new().network_policy(&np),
        Err(Error::MissingField {
            kind: "NetworkPolicy",
            field: "metadata.namespace",
        })
    );
}

#[test]
fn conversion_is_deterministic() {
    let mk = || {
        mk_policy(
            "ns-0",
            "p",
            mk_selector(&[("c", "3"), ("a", "1"), ("b", "2")]),
            vec![NetworkPolicyIngressRule {
                from: Some(vec![
                    mk_pod_peer(&[("z", "1"), ("y", "2")]),
                    mk_ip_block("192.168.0.0/16", &["192.168.2.0/24", "192.168.1.0/24"]),
                ]),
                ports: Some(vec![tcp_port(80), tcp_port(443)]),
            }],
            vec![],
            None,
        )
    };

    let converter = Converter::new();
    let a = converter.network_policy(&mk()).unwrap();
    let b = converter.network_policy(&mk()).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.selector,
        "projectcalico.org/orchestrator == 'k8s' && a == '1' && b == '2' && c == '3'"
    );
}

#[test]
fn pod_workload_endpoint() {
    let pod = mk_pod(
        "ns-0",
        "web-0",
        Some("node-1"),
        Some("10.0.0.12"),
        btreemap! {
            "app".to_string() => "web".to_string(),
            LABEL_ORCHESTRATOR.to_string() => "spoofed".to_string(),
        },
    );
    assert!(is_ready_pod(&pod));

    let wep = Converter::new().workload_endpoint(&pod).unwrap();
    assert_eq!(wep.metadata.name, "node--1-k8s-web--0-eth0");
    assert_eq!(wep.metadata.namespace.as_deref(), Some("ns-0"));
    assert_eq!(
        wep.metadata.labels,
        btreemap! {
            "app".to_string() => "web".to_string(),
            "projectcalico.org/namespace".to_string() => "ns-0".to_string(),
            "projectcalico.org/orchestrator".to_string() => "k8s".to_string(),
        }
    );
    assert_eq!(wep.orchestrator, "k8s");
    assert_eq!(wep.node, "node-1");
    assert_eq!(wep.pod, "web-0");
    assert_eq!(wep.endpoint, "eth0");
    assert_eq!(
        wep.interface_name,
        veth_name_for_workload("node--1-k8s-web--0-eth0")
    );
    assert_eq!(wep.profiles, vec!["kns.ns-0".to_string()]);
    assert_eq!(
        wep.ip_networks,
        vec!["10.0.0.12/32".parse::<IpNet>().unwrap()]
    );

    let ids = Converter::new()
        .parse_workload_endpoint_name(&wep.metadata.name)
        .unwrap();
    assert_eq!(ids, WorkloadEndpointIdentifiers::kubernetes("node-1", "web-0"));
}

#[test]
fn host_networked_pod_is_not_an_endpoint() {
    let mut pod = mk_pod("ns-0", "agent", Some("node-1"), Some("192.0.2.1"), BTreeMap::new());
    if let Some(spec) = pod.spec.as_mut() {
        spec.host_network = Some(true);
    }
    assert!(!is_valid_workload_endpoint(&pod));
    assert!(!is_ready_pod(&pod));
}

#[test]
fn pod_without_address_has_no_networks() {
    let pod = mk_pod("ns-0", "pending", Some("node-1"), None, BTreeMap::new());
    assert!(is_valid_workload_endpoint(&pod));
    assert!(!is_ready_pod(&pod));

    let wep = Converter::new().workload_endpoint(&pod).unwrap();
    assert!(wep.ip_networks.is_empty());
}

#[test]
fn endpoint_profile_backs_namespace() {
    let converter = Converter::new();
    let ns = mk_namespace("billing", BTreeMap::new());
    let pod = mk_pod("billing", "api", Some("node-1"), None, BTreeMap::new());

    let profile = converter.namespace_to_profile(&ns);
    let wep = converter.workload_endpoint(&pod).unwrap();
    assert_eq!(wep.profiles, vec![profile.metadata.name.clone()]);
    assert_eq!(
        converter.profile_name_to_namespace(&wep.profiles[0]),
        Ok("billing")
    );
}

// === Helpers ===

fn mk_selector(labels: &[(&str, &str)]) -> LabelSelector {
    LabelSelector {
        match_labels: Some(
            labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        ..Default::default()
    }
}

fn mk_pod_peer(labels: &[(&str, &str)]) -> NetworkPolicyPeer {
    NetworkPolicyPeer {
        pod_selector: Some(mk_selector(labels)),
        ..Default::default()
    }
}

fn mk_ip_block(cidr: &str, except: &[&str]) -> NetworkPolicyPeer {
    NetworkPolicyPeer {
        ip_block: Some(IPBlock {
            cidr: cidr.to_string(),
            except: Some(except.iter().map(|e| e.to_string()).collect()),
        }),
        ..Default::default()
    }
}

fn tcp_port(port: i32) -> NetworkPolicyPort {
    NetworkPolicyPort {
        port: Some(IntOrString::Int(port)),
        ..Default::default()
    }
}

fn mk_policy(
    ns: impl Into<String>,
    name: impl Into<String>,
    pod_selector: LabelSelector,
    ingress: Vec<NetworkPolicyIngressRule>,
    egress: Vec<NetworkPolicyEgressRule>,
    policy_types: Option<&[&str]>,
) -> k8s::NetworkPolicy {
    k8s::NetworkPolicy {
        metadata: ObjectMeta {
            namespace: Some(ns.into()),
            name: Some(name.into()),
            ..Default::default()
        },
        spec: Some(NetworkPolicySpec {
            pod_selector,
            ingress: Some(ingress),
            egress: Some(egress),
            policy_types: policy_types.map(|types| types.iter().map(|t| t.to_string()).collect()),
        }),
        ..Default::default()
    }
}

fn mk_namespace(name: impl Into<String>, labels: BTreeMap<String, String>) -> k8s::Namespace {
    k8s::Namespace {
        metadata: ObjectMeta {
            name: Some(name.into()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn mk_pod(
    ns: impl Into<String>,
    name: impl Into<String>,
    node: Option<&str>,
    pod_ip: Option<&str>,
    labels: BTreeMap<String, String>,
) -> k8s::Pod {
    k8s::Pod {
        metadata: ObjectMeta {
            namespace: Some(ns.into()),
            name: Some(name.into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(k8s::PodSpec {
            node_name: node.map(Into::into),
            ..Default::default()
        }),
        status: Some(k8s::PodStatus {
            pod_ip: pod_ip.map(Into::into),
            ..Default::default()
        }),
    }
}
