use crate::{
    calico::{self, PolicyType},
    compile_selector,
    k8s::{self, labels::Selector},
    mk_metadata, Converter, Direction, Error, Result, SelectorKind, NETWORK_POLICY_NAME_PREFIX,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// The order of every converted network policy.
pub const NETWORK_POLICY_ORDER: f64 = 1000.0;

/// The policy types of a policy that does not declare any.
///
/// `policyTypes` was introduced together with egress rules, so a policy without it predates
/// egress support and only governs ingress.
pub const DEFAULT_POLICY_TYPES: [PolicyType; 1] = [PolicyType::Ingress];

// === impl Converter ===

impl Converter {
    /// Converts a Kubernetes network policy into a Calico network policy.
    ///
    /// All ingress rules are expanded before egress rules, each in source order. If any rule fails
    /// to convert, no policy is returned.
    #[instrument(
        skip(self, np),
        fields(
            ns = ?np.metadata.namespace,
            name = ?np.metadata.name,
        )
    )]
    pub fn network_policy(&self, np: &k8s::NetworkPolicy) -> Result<calico::NetworkPolicy> {
        let missing = |field| Error::MissingField {
            kind: "NetworkPolicy",
            field,
        };
        let name = np
            .metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("metadata.name"))?;
        let namespace = np
            .metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| missing("metadata.namespace"))?;

        let default_spec = k8s::NetworkPolicySpec::default();
        let spec = np.spec.as_ref().unwrap_or(&default_spec);

        let selector = compile_selector(
            &Selector::try_from(&spec.pod_selector)?,
            SelectorKind::Pod,
        );

        let mut ingress_rules = Vec::new();
        for rule in spec.ingress.iter().flatten() {
            ingress_rules.extend(self.expand_rules(
                rule.from.as_deref().unwrap_or_default(),
                rule.ports.as_deref().unwrap_or_default(),
                Direction::Ingress,
            )?);
        }

        let mut egress_rules = Vec::new();
        for rule in spec.egress.iter().flatten() {
            egress_rules.extend(self.expand_rules(
                rule.to.as_deref().unwrap_or_default(),
                rule.ports.as_deref().unwrap_or_default(),
                Direction::Egress,
            )?);
        }

        let types = policy_types(
            spec.policy_types.as_deref().unwrap_or_default(),
            !egress_rules.is_empty(),
        );

        let mut metadata = mk_metadata(
            &np.metadata,
            format!("{}{}", NETWORK_POLICY_NAME_PREFIX, name),
        );
        metadata.namespace = Some(namespace.to_string());

        debug!(
            ingress = ingress_rules.len(),
            egress = egress_rules.len(),
            ?types,
            "Converted network policy"
        );
        Ok(calico::NetworkPolicy {
            metadata,
            order: NETWORK_POLICY_ORDER,
            selector,
            ingress_rules,
            egress_rules,
            types,
        })
    }
}

/// Determines the directions of traffic a policy governs from its declared policy types.
fn policy_types(declared: &[String], has_egress_rules: bool) -> BTreeSet<PolicyType> {
    let mut types = BTreeSet::new();
    for ty in declared {
        match ty.as_str() {
            "Ingress" => {
                types.insert(PolicyType::Ingress);
            }
            "Egress" => {
                types.insert(PolicyType::Egress);
            }
            ty => debug!(policy_type = %ty, "Ignoring unknown policy type"),
        }
    }

    // Egress rules without the Egress type have no effect.
    if has_egress_rules && !types.contains(&PolicyType::Egress) {
        warn!("Policy types do not include Egress, but the policy has egress rules");
    }

    if types.is_empty() {
        info!(default = ?DEFAULT_POLICY_TYPES, "Policy does not declare policy types");
        types.extend(DEFAULT_POLICY_TYPES);
    }

    types
}
