use std::str::FromStr;

use rtid_types::consensus::DeploymentPos;
use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;
use serde::{Deserialize, Serialize};

use crate::registry::ParamsRegistry;

/// Replacement activation window for one deployment, written on the command
/// line as `NAME:START:END`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOverride {
    pub deployment: String,
    pub start_time: i64,
    pub timeout: i64,
}

impl DeploymentOverride {
    pub fn position(&self) -> Result<DeploymentPos, RtidError> {
        self.deployment.parse()
    }

    /// Patch the registry's active set. Only regtest accepts overrides.
    pub fn apply(&self, registry: &mut ParamsRegistry) -> Result<(), RtidError> {
        let pos = self.position()?;
        let network = registry.active()?.network;
        if network != NetworkId::Regtest {
            return Err(RtidError::InvalidDeploymentOverride {
                reason: format!(
                    "deployment windows may only be overridden on regtest, not {}",
                    network.as_str()
                ),
            });
        }
        registry.patch_deployment(pos, self.start_time, self.timeout)
    }
}

impl FromStr for DeploymentOverride {
    type Err = RtidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [name, start, end] = parts.as_slice() else {
            return Err(RtidError::InvalidDeploymentOverride {
                reason: format!("'{}' is not of the form NAME:START:END", s),
            });
        };
        let parse_time = |field: &str, what: &str| {
            field
                .parse::<i64>()
                .map_err(|e| RtidError::InvalidDeploymentOverride {
                    reason: format!("invalid {} '{}': {}", what, field, e),
                })
        };
        let over = DeploymentOverride {
            deployment: name.to_string(),
            start_time: parse_time(*start, "start time")?,
            timeout: parse_time(*end, "timeout")?,
        };
        over.position()?;
        Ok(over)
    }
}
