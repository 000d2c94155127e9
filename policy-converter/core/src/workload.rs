use crate::{IpNet, Metadata, Protocol};
use serde::{Deserialize, Serialize};

/// A single network interface of a workload, e.g. a pod's `eth0`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEndpoint {
    pub metadata: Metadata,
    pub orchestrator: String,
    pub node: String,
    pub pod: String,
    pub endpoint: String,

    /// The name of the host-side interface for this endpoint.
    pub interface_name: String,

    pub profiles: Vec<String>,

    /// Empty until an address has been assigned.
    #[serde(default)]
    pub ip_networks: Vec<IpNet>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<EndpointPort>,
}

/// A named port exposed by a workload endpoint, used to resolve named ports in policy rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct EndpointPort {
    pub name: String,
    pub protocol: Protocol,
    pub port: u16,
}
