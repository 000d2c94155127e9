use crate::{IpNet, Port, Protocol};
use serde::{Deserialize, Serialize};

/// Converted rules only ever allow traffic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Allow,
}

/// A single policy rule.
///
/// A rule matches traffic when the protocol (if set) matches and both the source and destination
/// entities match. An empty entity matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub action: Action,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,

    #[serde(default, skip_serializing_if = "EntityRule::is_empty")]
    pub source: EntityRule,

    #[serde(default, skip_serializing_if = "EntityRule::is_empty")]
    pub destination: EntityRule,
}

/// Describes one side of a rule's match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nets: Vec<IpNet>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selector: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace_selector: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_nets: Vec<IpNet>,
}

// === impl Rule ===

impl Rule {
    /// An unconditional allow.
    pub fn allow() -> Self {
        Self {
            action: Action::Allow,
            ..Self::default()
        }
    }
}

// === impl EntityRule ===

impl EntityRule {
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
            && self.selector.is_empty()
            && self.namespace_selector.is_empty()
            && self.ports.is_empty()
            && self.not_nets.is_empty()
    }
}
