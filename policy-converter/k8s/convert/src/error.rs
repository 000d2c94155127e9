use crate::{calico, k8s};

/// A conversion failure.
///
/// Every variant describes input that cannot be converted without changing its meaning. None of
/// them are defaulted away, since a dropped peer or port changes which traffic a policy allows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("not a valid CIDR: {0:?}")]
    InvalidCidr(String),

    #[error(transparent)]
    InvalidIp(#[from] k8s::CidrParseError),

    #[error(transparent)]
    InvalidProtocol(#[from] calico::InvalidProtocol),

    #[error(transparent)]
    InvalidPort(#[from] calico::InvalidPort),

    #[error(transparent)]
    InvalidAsNumber(#[from] calico::InvalidAsNumber),

    #[error(transparent)]
    InvalidSelector(#[from] k8s::labels::InvalidOperator),

    #[error("a peer with an ipBlock must not set podSelector or namespaceSelector")]
    AmbiguousPeer,

    #[error("{kind} is missing {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("not a valid workload endpoint name: {0:?}")]
    InvalidEndpointName(String),

    #[error("profile {0:?} is not backed by a namespace")]
    NotNamespaceProfile(String),
}
