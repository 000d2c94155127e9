use crate::{
    calico::{
        EndpointPort, Protocol, WorkloadEndpoint, LABEL_NAMESPACE, LABEL_ORCHESTRATOR,
        ORCHESTRATOR_KUBERNETES,
    },
    k8s::{self, Cidr, ResourceExt},
    mk_metadata, veth_name_for_workload, Converter, Error, Result, WorkloadEndpointIdentifiers,
    NAMESPACE_PROFILE_NAME_PREFIX,
};
use tracing::{debug, instrument};

/// Indicates whether the pod shares its node's network namespace.
pub fn is_host_networked(pod: &k8s::Pod) -> bool {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.host_network)
        .unwrap_or(false)
}

/// Indicates whether the pod has been assigned to a node.
pub fn is_scheduled(pod: &k8s::Pod) -> bool {
    node_name(pod).is_some()
}

/// Indicates whether the pod has been assigned an address.
pub fn has_ip_address(pod: &k8s::Pod) -> bool {
    pod_ip(pod).is_some()
}

/// Indicates whether the pod should be represented as a workload endpoint.
///
/// Host-networked pods use the node's interfaces, and unscheduled pods have no interface yet.
pub fn is_valid_workload_endpoint(pod: &k8s::Pod) -> bool {
    if is_host_networked(pod) {
        debug!(pod = %pod.name_any(), "Pod is host networked");
        return false;
    }
    if !is_scheduled(pod) {
        debug!(pod = %pod.name_any(), "Pod is not scheduled");
        return false;
    }
    true
}

/// Indicates whether the pod is a valid workload endpoint that is ready for networking.
pub fn is_ready_pod(pod: &k8s::Pod) -> bool {
    if !is_valid_workload_endpoint(pod) {
        return false;
    }
    if !has_ip_address(pod) {
        debug!(pod = %pod.name_any(), "Pod does not have an IP address");
        return false;
    }
    true
}

fn node_name(pod: &k8s::Pod) -> Option<&str> {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.node_name.as_deref())
        .filter(|n| !n.is_empty())
}

fn pod_ip(pod: &k8s::Pod) -> Option<&str> {
    pod.status
        .as_ref()
        .and_then(|status| status.pod_ip.as_deref())
        .filter(|ip| !ip.is_empty())
}

// === impl Converter ===

impl Converter {
    /// Converts a pod into the workload endpoint for its default interface.
    ///
    /// The caller is expected to have checked [`is_valid_workload_endpoint`]; the pod must be named
    /// and scheduled. A pod that has not been assigned an address yet (or whose address has been
    /// released) converts with no networks.
    #[instrument(
        skip(self, pod),
        fields(
            ns = ?pod.metadata.namespace,
            name = ?pod.metadata.name,
        )
    )]
    pub fn workload_endpoint(&self, pod: &k8s::Pod) -> Result<WorkloadEndpoint> {
        let missing = |field| Error::MissingField { kind: "Pod", field };
        let pod_name = pod
            .metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("metadata.name"))?;
        let namespace = pod
            .metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| missing("metadata.namespace"))?;
        let node = node_name(pod).ok_or_else(|| missing("spec.nodeName"))?;

        let ids = WorkloadEndpointIdentifiers::kubernetes(node, pod_name);
        let name = ids.name()?;
        let interface_name = veth_name_for_workload(&name);

        let ip_networks = match pod_ip(pod) {
            Some(ip) => {
                let cidr = ip.parse::<Cidr>().map_err(|error| {
                    debug!(%ip, %error, "Failed to parse pod IP");
                    error
                })?;
                vec![cidr.network()]
            }
            None => vec![],
        };

        let mut labels = pod.labels().clone();
        labels.insert(LABEL_NAMESPACE.to_string(), namespace.to_string());
        labels.insert(
            LABEL_ORCHESTRATOR.to_string(),
            ORCHESTRATOR_KUBERNETES.to_string(),
        );

        let mut metadata = mk_metadata(&pod.metadata, name);
        metadata.namespace = Some(namespace.to_string());
        metadata.labels = labels;

        let ports = pod
            .spec
            .iter()
            .flat_map(|spec| spec.containers.iter())
            .flat_map(|container| container.ports.iter().flatten())
            .filter_map(endpoint_port)
            .collect();

        let WorkloadEndpointIdentifiers {
            node,
            orchestrator,
            pod,
            endpoint,
        } = ids;
        Ok(WorkloadEndpoint {
            metadata,
            orchestrator,
            node,
            pod,
            endpoint,
            interface_name,
            profiles: vec![format!("{}{}", NAMESPACE_PROFILE_NAME_PREFIX, namespace)],
            ip_networks,
            ports,
        })
    }
}

/// Exposes a named container port so that policies may refer to it by name.
///
/// Unnamed ports are not needed to resolve policy ports and are skipped, as are ports with a
/// protocol that Calico cannot match by name.
fn endpoint_port(port: &k8s::ContainerPort) -> Option<EndpointPort> {
    let name = port.name.as_deref().filter(|n| !n.is_empty())?;
    let number = u16::try_from(port.container_port)
        .ok()
        .filter(|n| *n != 0)?;

    let protocol = match port.protocol.as_deref() {
        None | Some("") | Some("TCP") => Protocol::Tcp,
        Some("UDP") => Protocol::Udp,
        Some(protocol) => {
            debug!(%name, %protocol, "Ignoring named port with unsupported protocol");
            return None;
        }
    };

    Some(EndpointPort {
        name: name.to_string(),
        protocol,
        port: number,
    })
}
