use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// An IP protocol, by well-known name or by number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
    Icmp,
    IcmpV6,
    UdpLite,
    Number(u8),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a valid protocol: {0:?}")]
pub struct InvalidProtocol(pub String);

// === impl Protocol ===

impl Protocol {
    /// Builds a numeric protocol. Zero is not a valid protocol number.
    pub fn number(n: u8) -> Option<Self> {
        (n != 0).then_some(Self::Number(n))
    }
}

impl FromStr for Protocol {
    type Err = InvalidProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "sctp" => Ok(Self::Sctp),
            "icmp" => Ok(Self::Icmp),
            "icmpv6" => Ok(Self::IcmpV6),
            "udplite" => Ok(Self::UdpLite),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::number)
                .ok_or_else(|| InvalidProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => "tcp".fmt(f),
            Self::Udp => "udp".fmt(f),
            Self::Sctp => "sctp".fmt(f),
            Self::Icmp => "icmp".fmt(f),
            Self::IcmpV6 => "icmpv6".fmt(f),
            Self::UdpLite => "udplite".fmt(f),
            Self::Number(n) => n.fmt(f),
        }
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_u8(*n),
            named => serializer.collect_str(named),
        }
    }
}

impl<'de> Deserialize<'de> for Protocol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u8),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => {
                Self::number(n).ok_or_else(|| de::Error::custom(InvalidProtocol(n.to_string())))
            }
            Repr::Name(name) => name.parse().map_err(de::Error::custom),
        }
    }
}
