use crate::{Metadata, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of default rules and inherited labels shared by the endpoints that reference it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub metadata: Metadata,

    #[serde(default)]
    pub ingress_rules: Vec<Rule>,

    #[serde(default)]
    pub egress_rules: Vec<Rule>,

    /// Labels applied to every endpoint that uses this profile.
    #[serde(default)]
    pub labels_to_apply: BTreeMap<String, String>,
}
