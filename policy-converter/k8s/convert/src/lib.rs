//! Kubernetes to Calico resource conversion
//!
//! Converts the Kubernetes resources that carry network intent into the Calico resource model:
//!
//! - A `NetworkPolicy` becomes a Calico `NetworkPolicy`. Its pod selector is compiled into a Calico
//!   selector expression, and each ingress/egress rule is expanded into one Calico rule per
//!   (port, peer) pair.
//! - A `Pod` becomes a `WorkloadEndpoint` with a deterministic name and interface name, the pod's
//!   labels, and its named container ports.
//! - A `Namespace` becomes a default-allow `Profile` whose labels are inherited by the endpoints
//!   in that namespace.
//! - A `Node`'s BGP annotations round-trip with a Calico `Node`.
//!
//! ```text
//! [ NetworkPolicy ] -> [ peers x ports ] -> [ Rule ]*
//! [ Pod ]           -> [ WorkloadEndpoint ] -> profile [ kns.<namespace> ] <- [ Namespace ]
//! ```
//!
//! Conversions are pure: they borrow their input, perform no I/O, and produce identical output for
//! identical input. Any malformed address, port or protocol fails the whole conversion; partially
//! converted policies are never returned.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod names;
mod namespace;
mod node;
mod peer;
mod pod;
mod policy;
mod port;
mod rule;
mod selector;

#[cfg(test)]
mod tests;

pub use self::{
    error::Error,
    names::{veth_name_for_workload, WorkloadEndpointIdentifiers, DEFAULT_ENDPOINT},
    node::{
        ANNOTATION_BGP_AS_NUMBER, ANNOTATION_BGP_IPV4_ADDR, ANNOTATION_BGP_IPV4_NET,
        ANNOTATION_IPV4,
    },
    peer::{Peer, PeerFields},
    pod::{
        has_ip_address, is_host_networked, is_ready_pod, is_scheduled, is_valid_workload_endpoint,
    },
    policy::{DEFAULT_POLICY_TYPES, NETWORK_POLICY_ORDER},
    port::{PortFields, DEFAULT_PROTOCOL},
    rule::Direction,
    selector::{compile_selector, SelectorKind},
};
pub use calico_policy_converter_core as calico;
pub use calico_policy_converter_k8s_api as k8s;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Prefix of the labels a namespace's profile applies to its endpoints.
pub const NAMESPACE_LABEL_PREFIX: &str = "pcns.";

/// Prefix of the name of the profile backing each namespace.
pub const NAMESPACE_PROFILE_NAME_PREFIX: &str = "kns.";

/// Prefix of the name of each converted network policy.
pub const NETWORK_POLICY_NAME_PREFIX: &str = "knp.default.";

/// Converts Kubernetes resources into Calico resources.
///
/// A `Converter` holds no state besides its options, so a single value may be shared freely across
/// threads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Converter {
    malformed_peers: MalformedPeers,
}

/// Determines how a policy peer that cannot be converted is handled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MalformedPeers {
    /// Fail the conversion of the enclosing policy.
    #[default]
    Reject,

    /// Log the failure and treat the peer as matching all traffic.
    ///
    /// This widens the converted policy and should only be used when availability matters more
    /// than the precision of the policy.
    Unrestricted,
}

// === impl Converter ===

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_malformed_peers(self, malformed_peers: MalformedPeers) -> Self {
        Self { malformed_peers }
    }
}

/// Copies the identity and revision of a source object, naming the converted resource `name`.
fn mk_metadata(meta: &k8s::ObjectMeta, name: String) -> calico::Metadata {
    calico::Metadata {
        name,
        namespace: None,
        labels: Default::default(),
        uid: meta.uid.clone(),
        creation_timestamp: meta.creation_timestamp.as_ref().map(|t| t.0),
        revision: meta.resource_version.clone(),
    }
}
