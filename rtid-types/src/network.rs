use serde::{Deserialize, Serialize};

use crate::error::RtidError;

/// Network identifier for distinguishing the production, public test, and
/// local regression-test chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Main,
    Test,
    Regtest,
}

impl NetworkId {
    /// Every recognised network, in selection order.
    pub const ALL: [NetworkId; 3] = [NetworkId::Main, NetworkId::Test, NetworkId::Regtest];

    /// Short lowercase identifier (for CLI/config), also the parameter set's
    /// network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Main => "main",
            NetworkId::Test => "test",
            NetworkId::Regtest => "regtest",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            NetworkId::Main => "Mainnet",
            NetworkId::Test => "Testnet",
            NetworkId::Regtest => "Regtest",
        }
    }

    /// Parse from a string identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main" => Some(NetworkId::Main),
            "test" => Some(NetworkId::Test),
            "regtest" => Some(NetworkId::Regtest),
            _ => None,
        }
    }
}

impl std::str::FromStr for NetworkId {
    type Err = RtidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkId::parse(s).ok_or_else(|| RtidError::UnknownNetwork {
            name: s.to_string(),
        })
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
