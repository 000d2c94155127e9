#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod cidr;
pub mod labels;

pub use self::cidr::{Cidr, CidrParseError};
pub use k8s_openapi::{
    api::{
        self,
        core::v1::{Container, ContainerPort, Namespace, Node, Pod, PodSpec, PodStatus},
        networking::v1::{
            IPBlock, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule,
            NetworkPolicyPeer, NetworkPolicyPort, NetworkPolicySpec,
        },
    },
    apimachinery::pkg::{
        apis::meta::v1::{LabelSelector, LabelSelectorRequirement, ObjectMeta, Time},
        util::intstr::IntOrString,
    },
};
pub use kube::ResourceExt;
