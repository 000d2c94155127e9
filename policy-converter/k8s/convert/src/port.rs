use crate::{
    calico::{InvalidPort, Port, Protocol},
    k8s::{self, IntOrString},
    Error, Result,
};

/// The protocol of a policy port that does not specify one.
///
/// Kubernetes treats TCP as the implicit default, but Calico requires a protocol whenever a rule
/// matches on ports, so the default is made explicit.
pub const DEFAULT_PROTOCOL: Protocol = Protocol::Tcp;

/// The Calico rule fields that express a policy port.
///
/// The default value matches any protocol and any port.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortFields {
    pub protocol: Option<Protocol>,
    pub ports: Vec<Port>,
}

// === impl PortFields ===

impl TryFrom<&k8s::NetworkPolicyPort> for PortFields {
    type Error = Error;

    fn try_from(port: &k8s::NetworkPolicyPort) -> Result<Self> {
        let mut fields = Self::default();

        match (port.port.as_ref(), port.end_port) {
            (Some(p), end_port) => {
                fields.ports.push(parse_port(p, end_port)?);
                fields.protocol = Some(DEFAULT_PROTOCOL);
            }
            (None, Some(end_port)) => return Err(InvalidPort(format!(":{}", end_port)).into()),
            (None, None) => {}
        }

        // A protocol without a port matches every port of that protocol.
        if let Some(protocol) = port.protocol.as_deref() {
            fields.protocol = Some(protocol.parse::<Protocol>()?);
        }

        Ok(fields)
    }
}

/// Converts a policy port, and an optional end port, into a Calico port.
///
/// Numeric strings are treated as port numbers; other strings are named ports that are resolved
/// against endpoint ports by Calico.
fn parse_port(port: &IntOrString, end_port: Option<i32>) -> Result<Port> {
    let port = match port {
        IntOrString::Int(n) => {
            let n = u16::try_from(*n).map_err(|_| InvalidPort(n.to_string()))?;
            Port::number(n)?
        }
        IntOrString::String(s) => s.parse::<Port>()?,
    };

    match (port, end_port) {
        (port, None) => Ok(port),
        (Port::Number(min), Some(end)) => {
            let max = u16::try_from(end).map_err(|_| InvalidPort(format!("{}:{}", min, end)))?;
            Ok(Port::range(min, max)?)
        }
        (port, Some(end)) => Err(InvalidPort(format!("{}:{}", port, end)).into()),
    }
}
