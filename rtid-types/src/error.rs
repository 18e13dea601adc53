use thiserror::Error;

use crate::uint256::U256;

/// Which of the pinned genesis values failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisField {
    PowHash,
    BlockHash,
    MerkleRoot,
}

impl std::fmt::Display for GenesisField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            GenesisField::PowHash => "proof-of-work hash",
            GenesisField::BlockHash => "block hash",
            GenesisField::MerkleRoot => "merkle root",
        })
    }
}

/// All errors raised while building or selecting chain parameters.
///
/// Every variant is fatal to parameter selection: nothing here is retried,
/// and a failed selection leaves the previously active set in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtidError {
    // ─── Selection ───────────────────────────────────────────────────────────
    #[error("unknown network '{name}', expected 'main', 'test', or 'regtest'")]
    UnknownNetwork { name: String },

    #[error("chain parameters read before any network was selected")]
    UninitializedAccess,

    // ─── Construction ────────────────────────────────────────────────────────
    #[error("{network} genesis {field} mismatch: expected {expected}, got {actual}")]
    GenesisMismatch {
        network: String,
        field: GenesisField,
        expected: String,
        actual: String,
    },

    #[error(
        "proof-of-work limit sanity check failed: max/pow_limit = {ratio}, \
         expected {expected} and at least the averaging window {averaging_window}"
    )]
    SanityViolation {
        ratio: U256,
        expected: u64,
        averaging_window: u64,
    },

    #[error("invalid genesis block: {reason}")]
    InvalidGenesis { reason: String },

    #[error("invalid hex: {reason}")]
    InvalidHex { reason: String },

    #[error("invalid proof-of-work parameters: {reason}")]
    InvalidPowParams { reason: String },

    // ─── Deployments ─────────────────────────────────────────────────────────
    #[error("unknown deployment '{0}'")]
    UnknownDeployment(String),

    #[error("invalid deployment override: {reason}")]
    InvalidDeploymentOverride { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_network_display() {
        let err = RtidError::UnknownNetwork {
            name: "mainnet".to_string(),
        };
        assert!(err.to_string().contains("'mainnet'"));
    }

    #[test]
    fn test_genesis_mismatch_names_field() {
        let err = RtidError::GenesisMismatch {
            network: "test".to_string(),
            field: GenesisField::MerkleRoot,
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("test genesis merkle root mismatch"));
        assert!(msg.contains("expected aa"));
        assert!(msg.contains("got bb"));
    }

    #[test]
    fn test_sanity_violation_display() {
        let err = RtidError::SanityViolation {
            ratio: U256::from(16u64),
            expected: 17,
            averaging_window: 17,
        };
        assert!(err.to_string().contains("= 16"));
    }
}
