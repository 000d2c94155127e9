//! The Calico resource model produced by the Kubernetes converters.
//!
//! Every type here is a plain value: converters build a fresh tree for each source object and
//! nothing in the model refers back to the Kubernetes resource it was derived from.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod metadata;
mod node;
mod policy;
mod port;
mod profile;
mod protocol;
mod rule;
pub mod selector;
mod workload;

pub use self::{
    metadata::Metadata,
    node::{AsNumber, InvalidAsNumber, Node},
    policy::{NetworkPolicy, PolicyType},
    port::{InvalidPort, Port},
    profile::Profile,
    protocol::{InvalidProtocol, Protocol},
    rule::{Action, EntityRule, Rule},
    selector::{Clause, SelectorExpr},
    workload::{EndpointPort, WorkloadEndpoint},
};
pub use ipnet::{IpNet, Ipv4Net, Ipv6Net};

/// Label set on every workload endpoint with the name of its namespace.
pub const LABEL_NAMESPACE: &str = "projectcalico.org/namespace";

/// Label set on every workload endpoint with the name of its orchestrator.
pub const LABEL_ORCHESTRATOR: &str = "projectcalico.org/orchestrator";

/// The orchestrator identifier used for Kubernetes-managed workloads.
pub const ORCHESTRATOR_KUBERNETES: &str = "k8s";
