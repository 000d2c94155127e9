use crate::{
    calico::{self, AsNumber, IpNet},
    k8s::{self, CidrParseError, ResourceExt},
    mk_metadata, Converter, Error, Result,
};
use std::{collections::BTreeMap, net::IpAddr};
use tracing::{debug, instrument};

/// Annotation holding the node's BGP peering address.
pub const ANNOTATION_BGP_IPV4_ADDR: &str = "projectcalico.org/BGPIPv4Addr";

/// Annotation holding the node's BGP address together with the prefix length of its network.
pub const ANNOTATION_BGP_IPV4_NET: &str = "projectcalico.org/BGPIPv4Net";

/// Annotation holding the node's AS number.
pub const ANNOTATION_BGP_AS_NUMBER: &str = "projectcalico.org/BGPASNumber";

/// Legacy annotation holding the node's address. Read when the BGP address is not set.
pub const ANNOTATION_IPV4: &str = "projectcalico.org/IPv4";

// === impl Converter ===

impl Converter {
    /// Reads a node's BGP configuration from its annotations.
    ///
    /// Missing annotations leave the corresponding field unset; malformed annotations fail the
    /// conversion.
    #[instrument(skip(self, node), fields(name = ?node.metadata.name))]
    pub fn k8s_node_to_calico(&self, node: &k8s::Node) -> Result<calico::Node> {
        let name = node
            .metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(Error::MissingField {
                kind: "Node",
                field: "metadata.name",
            })?;
        let annotations = node.annotations();

        let bgp_ipv4_address = annotation(annotations, ANNOTATION_BGP_IPV4_ADDR)
            .or_else(|| annotation(annotations, ANNOTATION_IPV4))
            .map(|addr| {
                addr.parse::<IpAddr>()
                    .map_err(|_| CidrParseError(addr.to_string()))
            })
            .transpose()?;

        let bgp_ipv4_network = annotation(annotations, ANNOTATION_BGP_IPV4_NET)
            .map(|net| {
                net.parse::<IpNet>()
                    .map_err(|_| Error::InvalidCidr(net.to_string()))
            })
            .transpose()?;

        let bgp_as_number = annotation(annotations, ANNOTATION_BGP_AS_NUMBER)
            .map(str::parse::<AsNumber>)
            .transpose()?;

        debug!(
            address = ?bgp_ipv4_address,
            network = ?bgp_ipv4_network,
            asn = ?bgp_as_number,
            "Read node BGP configuration"
        );

        let mut metadata = mk_metadata(&node.metadata, name.to_string());
        metadata.labels = node.labels().clone();
        Ok(calico::Node {
            metadata,
            bgp_ipv4_address,
            bgp_ipv4_network,
            bgp_as_number,
        })
    }

    /// Writes a node's BGP configuration into the annotations of a Kubernetes node.
    ///
    /// When `existing` is provided, the returned node is a copy of it with the node's labels
    /// replaced and the BGP annotations updated; all other state is preserved. Unset fields
    /// remove their annotations.
    #[instrument(skip(self, node, existing), fields(name = %node.metadata.name))]
    pub fn calico_node_to_k8s(
        &self,
        node: &calico::Node,
        existing: Option<&k8s::Node>,
    ) -> k8s::Node {
        let mut k8s_node = existing.cloned().unwrap_or_default();
        let meta = &mut k8s_node.metadata;
        meta.name = Some(node.metadata.name.clone());
        if node.metadata.revision.is_some() {
            meta.resource_version = node.metadata.revision.clone();
        }
        meta.labels = Some(node.metadata.labels.clone()).filter(|l| !l.is_empty());

        let mut annotations = meta.annotations.take().unwrap_or_default();
        // The legacy address annotation is superseded once the address is written.
        annotations.remove(ANNOTATION_IPV4);
        set_annotation(
            &mut annotations,
            ANNOTATION_BGP_IPV4_ADDR,
            node.bgp_ipv4_address,
        );
        set_annotation(
            &mut annotations,
            ANNOTATION_BGP_IPV4_NET,
            node_network(node),
        );
        set_annotation(
            &mut annotations,
            ANNOTATION_BGP_AS_NUMBER,
            node.bgp_as_number,
        );
        meta.annotations = Some(annotations).filter(|a| !a.is_empty());

        k8s_node
    }
}

fn annotation<'a>(annotations: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn set_annotation<T: ToString>(
    annotations: &mut BTreeMap<String, String>,
    key: &str,
    value: Option<T>,
) {
    match value {
        Some(value) => {
            annotations.insert(key.to_string(), value.to_string());
        }
        None => {
            annotations.remove(key);
        }
    }
}

/// The node's network, expressed as the node's address with the network's prefix length.
///
/// A network with host bits cleared would lose the address, so the address is recombined with the
/// prefix length rather than taking the network as stored.
fn node_network(node: &calico::Node) -> Option<IpNet> {
    let net = node.bgp_ipv4_network?;
    match node.bgp_ipv4_address {
        Some(addr) if addr.is_ipv4() == net.addr().is_ipv4() => {
            Some(IpNet::new(addr, net.prefix_len()).unwrap_or(net))
        }
        _ => Some(net),
    }
}
