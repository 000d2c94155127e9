use crate::{IpNet, Metadata};
use serde::{Deserialize, Serialize};
use std::{fmt, net::IpAddr, str::FromStr};

/// A cluster node's BGP configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub metadata: Metadata,

    #[serde(
        default,
        rename = "bgpIPv4Address",
        skip_serializing_if = "Option::is_none"
    )]
    pub bgp_ipv4_address: Option<IpAddr>,

    /// The node's address together with the prefix length of its network. Host bits are retained
    /// so that the address can be recovered from this field alone.
    #[serde(
        default,
        rename = "bgpIPv4Network",
        skip_serializing_if = "Option::is_none"
    )]
    pub bgp_ipv4_network: Option<IpNet>,

    /// Unset means the node uses the cluster-wide default AS number.
    #[serde(
        default,
        rename = "bgpASNumber",
        skip_serializing_if = "Option::is_none"
    )]
    pub bgp_as_number: Option<AsNumber>,
}

/// A 32-bit BGP autonomous system number.
///
/// Parses both plain (`64512`) and dotted (`1.10`) notation; always displays as plain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AsNumber(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a valid AS number: {0:?}")]
pub struct InvalidAsNumber(pub String);

// === impl AsNumber ===

impl FromStr for AsNumber {
    type Err = InvalidAsNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidAsNumber(s.to_string());
        match s.trim().split_once('.') {
            None => s.trim().parse().map(Self).map_err(|_| invalid()),
            Some((high, low)) => {
                let high = high.parse::<u16>().map_err(|_| invalid())?;
                let low = low.parse::<u16>().map_err(|_| invalid())?;
                Ok(Self((u32::from(high) << 16) | u32::from(low)))
            }
        }
    }
}

impl fmt::Display for AsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
