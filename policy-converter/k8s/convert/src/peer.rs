use crate::{
    calico::IpNet,
    k8s::{self, labels::Selector},
    selector::{compile_selector, kubernetes_endpoints, SelectorKind},
    Error, Result,
};
use tracing::warn;

/// The traffic source (for ingress) or destination (for egress) of a policy rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Peer {
    /// No constraint.
    Any,

    /// Pods in the policy's namespace that match the selector.
    Pods(Selector),

    /// All pods in namespaces that match the selector.
    Namespaces(Selector),

    /// Pods matching `pods` in namespaces matching `namespaces`.
    PodsInNamespaces {
        pods: Selector,
        namespaces: Selector,
    },

    /// Addresses within `cidr` but outside every network in `except`.
    IpBlock { cidr: String, except: Vec<String> },
}

/// The Calico entity fields that express a peer.
///
/// The default value is an unrestricted peer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeerFields {
    pub selector: String,
    pub namespace_selector: String,
    pub nets: Vec<IpNet>,
    pub not_nets: Vec<IpNet>,
}

// === impl Peer ===

impl Peer {
    /// Computes the Calico entity fields for this peer.
    ///
    /// Fails if the IP block or any of its exceptions is not a valid CIDR.
    pub fn classify(&self) -> Result<PeerFields> {
        match self {
            Self::Any => Ok(PeerFields::default()),

            Self::Pods(pods) => Ok(PeerFields {
                selector: compile_selector(pods, SelectorKind::Pod),
                ..PeerFields::default()
            }),

            // Namespace selectors only select namespaces; the rule must still be limited to the
            // Kubernetes endpoints within them.
            Self::Namespaces(namespaces) => Ok(PeerFields {
                selector: kubernetes_endpoints().to_string(),
                namespace_selector: compile_selector(namespaces, SelectorKind::Namespace),
                ..PeerFields::default()
            }),

            Self::PodsInNamespaces { pods, namespaces } => Ok(PeerFields {
                selector: compile_selector(pods, SelectorKind::Pod),
                namespace_selector: compile_selector(namespaces, SelectorKind::Namespace),
                ..PeerFields::default()
            }),

            Self::IpBlock { cidr, except } => {
                let nets = vec![parse_cidr(cidr)?];
                let not_nets = except
                    .iter()
                    .map(|cidr| parse_cidr(cidr))
                    .collect::<Result<Vec<_>>>()?;
                Ok(PeerFields {
                    nets,
                    not_nets,
                    ..PeerFields::default()
                })
            }
        }
    }
}

impl TryFrom<&k8s::NetworkPolicyPeer> for Peer {
    type Error = Error;

    fn try_from(peer: &k8s::NetworkPolicyPeer) -> Result<Self> {
        let k8s::NetworkPolicyPeer {
            ip_block,
            namespace_selector,
            pod_selector,
        } = peer;

        match (ip_block, pod_selector, namespace_selector) {
            (None, None, None) => Ok(Self::Any),
            (None, Some(pods), None) => Ok(Self::Pods(pods.try_into()?)),
            (None, None, Some(namespaces)) => Ok(Self::Namespaces(namespaces.try_into()?)),
            (None, Some(pods), Some(namespaces)) => Ok(Self::PodsInNamespaces {
                pods: pods.try_into()?,
                namespaces: namespaces.try_into()?,
            }),
            (Some(block), None, None) => Ok(Self::IpBlock {
                cidr: block.cidr.clone(),
                except: block.except.clone().unwrap_or_default(),
            }),
            (Some(_), _, _) => Err(Error::AmbiguousPeer),
        }
    }
}

/// Parses a network in CIDR notation, clearing any host bits. Bare addresses are rejected.
fn parse_cidr(cidr: &str) -> Result<IpNet> {
    match cidr.parse::<IpNet>() {
        Ok(net) => Ok(net.trunc()),
        Err(error) => {
            warn!(%cidr, %error, "Failed to parse CIDR");
            Err(Error::InvalidCidr(cidr.to_string()))
        }
    }
}
