use crate::{calico::ORCHESTRATOR_KUBERNETES, Converter, Error, Result};
use sha1::{Digest, Sha1};
use std::{fmt, str::FromStr};

/// The name of the single endpoint of every Kubernetes pod.
pub const DEFAULT_ENDPOINT: &str = "eth0";

/// The host-side interface names of workload endpoints share this prefix.
const VETH_PREFIX: &str = "cali";

/// Linux limits interface names to 15 characters.
const VETH_HASH_LEN: usize = 11;

/// Returns the host-side interface name for a workload endpoint.
///
/// The name is derived from a SHA-1 digest of the endpoint name, so the CNI plugin and the
/// converter agree on it without coordination.
pub fn veth_name_for_workload(workload: &str) -> String {
    let digest = hex::encode(Sha1::digest(workload.as_bytes()));
    format!("{}{}", VETH_PREFIX, &digest[..VETH_HASH_LEN])
}

/// The components of a workload endpoint name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkloadEndpointIdentifiers {
    pub node: String,
    pub orchestrator: String,
    pub pod: String,
    pub endpoint: String,
}

// === impl WorkloadEndpointIdentifiers ===

impl WorkloadEndpointIdentifiers {
    /// Identifies the default endpoint of a Kubernetes pod.
    pub fn kubernetes(node: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            orchestrator: ORCHESTRATOR_KUBERNETES.to_string(),
            pod: pod.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Computes the endpoint name, `<node>-<orchestrator>-<pod>-<endpoint>`.
    ///
    /// Dashes within each component are doubled so that the name can be split back into its
    /// components. Fails if any component is empty.
    pub fn name(&self) -> Result<String> {
        let parts = [&self.node, &self.orchestrator, &self.pod, &self.endpoint];
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidEndpointName(self.to_string()));
        }

        Ok(parts
            .iter()
            .map(|p| p.replace('-', "--"))
            .collect::<Vec<_>>()
            .join("-"))
    }
}

impl FromStr for WorkloadEndpointIdentifiers {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = Vec::with_capacity(4);
        let mut part = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                // Escapes are consumed greedily, so a component may not begin with a dash.
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    part.push('-');
                }
                '-' => parts.push(std::mem::take(&mut part)),
                c => part.push(c),
            }
        }
        parts.push(part);

        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidEndpointName(s.to_string()));
        }
        match <[String; 4]>::try_from(parts) {
            Ok([node, orchestrator, pod, endpoint]) => Ok(Self {
                node,
                orchestrator,
                pod,
                endpoint,
            }),
            Err(_) => Err(Error::InvalidEndpointName(s.to_string())),
        }
    }
}

impl fmt::Display for WorkloadEndpointIdentifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node={:?} orchestrator={:?} pod={:?} endpoint={:?}",
            self.node, self.orchestrator, self.pod, self.endpoint
        )
    }
}

// === impl Converter ===

impl Converter {
    /// Splits a workload endpoint name into its components.
    pub fn parse_workload_endpoint_name(&self, name: &str) -> Result<WorkloadEndpointIdentifiers> {
        name.parse()
    }
}
