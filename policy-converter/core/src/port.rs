use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A destination port match: a single port, an inclusive range, or a named port that is resolved
/// against the ports of the selected workload endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    Number(u16),
    Range { min: u16, max: u16 },
    Named(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a valid port: {0:?}")]
pub struct InvalidPort(pub String);

// === impl Port ===

impl Port {
    /// Builds a numeric port, rejecting zero.
    pub fn number(port: u16) -> Result<Self, InvalidPort> {
        if port == 0 {
            return Err(InvalidPort(port.to_string()));
        }
        Ok(Self::Number(port))
    }

    /// Builds an inclusive port range, rejecting zero and decreasing ranges.
    pub fn range(min: u16, max: u16) -> Result<Self, InvalidPort> {
        if min == 0 || min > max {
            return Err(InvalidPort(format!("{}:{}", min, max)));
        }
        if min == max {
            return Ok(Self::Number(min));
        }
        Ok(Self::Range { min, max })
    }
}

impl FromStr for Port {
    type Err = InvalidPort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPort(s.to_string());

        if let Some((min, max)) = s.split_once(':') {
            let min = min.parse::<u16>().map_err(|_| invalid())?;
            let max = max.parse::<u16>().map_err(|_| invalid())?;
            return Self::range(min, max).map_err(|_| invalid());
        }

        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let port = s.parse::<u16>().map_err(|_| invalid())?;
            return Self::number(port).map_err(|_| invalid());
        }

        // Port names must contain a letter and may not begin with a hyphen.
        let named = s.bytes().any(|b| b.is_ascii_alphabetic())
            && !s.starts_with('-')
            && !s.chars().any(char::is_whitespace);
        if !named {
            return Err(invalid());
        }
        Ok(Self::Named(s.to_string()))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(port) => port.fmt(f),
            Self::Range { min, max } => write!(f, "{}:{}", min, max),
            Self::Named(name) => name.fmt(f),
        }
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(port) => serializer.serialize_u16(*port),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u16),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(port) => Self::number(port).map_err(de::Error::custom),
            Repr::Str(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
