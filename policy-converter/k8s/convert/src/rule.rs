use crate::{
    calico::{Action, EntityRule, Rule},
    k8s, Converter, MalformedPeers, Peer, PeerFields, PortFields, Result,
};
use tracing::{error, trace};

/// The direction of traffic a policy rule governs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Peers are traffic sources.
    Ingress,

    /// Peers are traffic destinations.
    Egress,
}

// === impl Converter ===

impl Converter {
    /// Expands a single Kubernetes policy rule into Calico rules.
    ///
    /// Calico rules carry one set of peer fields and one port set, so one rule is produced for every
    /// (port, peer) pair, ports in the outer loop. Missing peers or ports are treated as a single
    /// unrestricted entry, so every Kubernetes rule yields at least one Calico rule. Rules are not
    /// merged or de-duplicated.
    pub fn expand_rules(
        &self,
        peers: &[k8s::NetworkPolicyPeer],
        ports: &[k8s::NetworkPolicyPort],
        direction: Direction,
    ) -> Result<Vec<Rule>> {
        let peers = if peers.is_empty() {
            vec![PeerFields::default()]
        } else {
            peers
                .iter()
                .map(|peer| self.classify_peer(peer))
                .collect::<Result<Vec<_>>>()?
        };

        let ports = if ports.is_empty() {
            vec![PortFields::default()]
        } else {
            ports
                .iter()
                .map(PortFields::try_from)
                .collect::<Result<Vec<_>>>()?
        };

        let mut rules = Vec::with_capacity(ports.len() * peers.len());
        for port in &ports {
            for peer in &peers {
                rules.push(mk_rule(direction, peer.clone(), port.clone()));
            }
        }
        trace!(?direction, rules = rules.len(), "Expanded rule");
        Ok(rules)
    }

    fn classify_peer(&self, peer: &k8s::NetworkPolicyPeer) -> Result<PeerFields> {
        match Peer::try_from(peer).and_then(|peer| peer.classify()) {
            Ok(fields) => Ok(fields),
            Err(error) => match self.malformed_peers {
                MalformedPeers::Reject => Err(error),
                MalformedPeers::Unrestricted => {
                    error!(%error, "Treating malformed peer as unrestricted");
                    Ok(PeerFields::default())
                }
            },
        }
    }
}

fn mk_rule(direction: Direction, peer: PeerFields, port: PortFields) -> Rule {
    let PeerFields {
        selector,
        namespace_selector,
        nets,
        not_nets,
    } = peer;
    let peer = EntityRule {
        nets,
        selector,
        namespace_selector,
        not_nets,
        ports: vec![],
    };

    let PortFields { protocol, ports } = port;
    match direction {
        Direction::Ingress => Rule {
            action: Action::Allow,
            protocol,
            source: peer,
            destination: EntityRule {
                ports,
                ..EntityRule::default()
            },
        },
        Direction::Egress => Rule {
            action: Action::Allow,
            protocol,
            source: EntityRule::default(),
            destination: EntityRule { ports, ..peer },
        },
    }
}
