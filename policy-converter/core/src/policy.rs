use crate::{Metadata, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A namespaced Calico network policy.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    pub metadata: Metadata,

    /// Policies are applied in ascending order.
    pub order: f64,

    /// Selects the endpoints the policy applies to.
    pub selector: String,

    #[serde(default)]
    pub ingress_rules: Vec<Rule>,

    #[serde(default)]
    pub egress_rules: Vec<Rule>,

    /// The directions of traffic the policy governs. Never empty.
    pub types: BTreeSet<PolicyType>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum PolicyType {
    Ingress,
    Egress,
}
