//! Local regression-test network: trivial difficulty, no retargeting and
//! deployments that can be forced through the registry.

use rtid_types::consensus::{ConsensusRules, Deployment, Deployments};
use rtid_types::constants::*;
use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;
use rtid_types::primitives::*;
use rtid_types::uint256::U256;

use crate::genesis::{build_genesis, GenesisLiterals, GenesisPins};
use crate::params::{Base58Prefixes, ChainParams, ChainTxData, Checkpoints};

pub const GENESIS: GenesisLiterals = GenesisLiterals {
    time: REGTEST_GENESIS_TIME,
    nonce: REGTEST_GENESIS_NONCE,
    bits: REGTEST_GENESIS_BITS,
    version: GENESIS_VERSION,
    reward: GENESIS_REWARD,
};

pub const GENESIS_PINS: GenesisPins = GenesisPins {
    pow_hash: "c7dca3e7692a3ad321a330e88e7740c6de9dc6c608bc6fc53afb306f403895fb",
    block_hash: "f0568be9b2f5d3346c2523d36c71ae83904229d278932db0cd702c5f7ffdadfb",
    merkle_root: "f937149a8538d3a3c7274cfdd054017a3f3dca99f98b590491beb1fa13a0d12a",
};

/// `U256::MAX / 17`.
pub const POW_LIMIT: &str = "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f";

fn consensus_rules(hash_genesis_block: Hash) -> Result<ConsensusRules, RtidError> {
    Ok(ConsensusRules {
        subsidy_halving_interval: 150,
        bip16_height: 0,
        // Far in the future so version 1 blocks stay valid.
        bip34_height: 100_000_000,
        bip34_hash: ZERO_HASH,
        bip65_height: 1351,
        bip66_height: 1251,
        pow_limit: U256::from_hex(POW_LIMIT)?,
        pow_target_spacing: 5,
        pow_target_timespan: 61_200,
        pow_averaging_window: 17,
        pow_max_adjust_up: 0,
        pow_max_adjust_down: 0,
        pow_allow_min_difficulty_blocks: true,
        pow_allow_min_difficulty_blocks_after_height: None,
        pow_no_retargeting: true,
        rule_change_activation_threshold: 108,
        miner_confirmation_window: 144,
        deployments: Deployments::new(
            Deployment {
                bit: 28,
                start_time: 0,
                timeout: Deployment::NO_TIMEOUT,
            },
            Deployment {
                bit: 0,
                start_time: 0,
                timeout: Deployment::NO_TIMEOUT,
            },
            Deployment {
                bit: 1,
                start_time: Deployment::ALWAYS_ACTIVE,
                timeout: Deployment::NO_TIMEOUT,
            },
        ),
        minimum_chain_work: U256::zero(),
        default_assume_valid: hash_genesis_block,
        hash_genesis_block,
    })
}

/// Build and verify the regression-test network parameters.
pub fn params() -> Result<ChainParams, RtidError> {
    let (genesis, genesis_hashes) = build_genesis(NetworkId::Regtest, &GENESIS, &GENESIS_PINS)?;
    let consensus = consensus_rules(genesis_hashes.block_hash)?;
    consensus.check_pow_limit(REGTEST_POW_LIMIT_RATIO)?;

    Ok(ChainParams {
        network: NetworkId::Regtest,
        consensus,
        message_start: [0xa6, 0xef, 0xb7, 0x98],
        default_port: 45340,
        prune_after_height: 1000,
        dns_seeds: Vec::new(),
        fixed_seeds: Vec::new(),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![61],
            script_address: vec![123],
            secret_key: vec![239],
            ext_public_key: vec![0x04, 0x35, 0x87, 0xcf],
            ext_secret_key: vec![0x04, 0x35, 0x83, 0x94],
        },
        bech32_hrp: "rrid".to_string(),
        checkpoints: Checkpoints::new([(0, genesis_hashes.block_hash)]),
        chain_tx_data: ChainTxData::default(),
        genesis,
        genesis_hashes,
        default_consistency_checks: true,
        require_standard: false,
        mine_blocks_on_demand: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtid_types::consensus::DeploymentPos;

    #[test]
    fn test_regtest_params() {
        let params = params().unwrap();
        assert_eq!(params.network_id(), "regtest");
        assert_eq!(hash_to_hex(&params.genesis_hash()), GENESIS_PINS.block_hash);
        assert!(params.dns_seeds.is_empty());
        assert!(params.fixed_seeds.is_empty());
        assert!(params.mine_blocks_on_demand);
        assert_eq!(
            params.consensus.default_assume_valid,
            params.consensus.hash_genesis_block
        );
    }

    #[test]
    fn test_regtest_retarget_disabled() {
        let rules = consensus_rules(ZERO_HASH).unwrap();
        assert!(rules.pow_no_retargeting);
        assert!(rules.pow_allow_min_difficulty_blocks);
        assert_eq!(rules.min_actual_timespan(), rules.averaging_window_timespan());
        assert_eq!(rules.max_actual_timespan(), rules.averaging_window_timespan());
        assert_eq!(U256::MAX / rules.pow_limit, U256::from(17u64));
    }

    #[test]
    fn test_regtest_deployments_start_immediately() {
        let rules = consensus_rules(ZERO_HASH).unwrap();
        let csv = rules.deployments.get(DeploymentPos::Csv);
        assert_eq!(csv.start_time, 0);
        assert!(!csv.has_timeout());
        assert!(rules.deployments.get(DeploymentPos::Segwit).is_always_active());
    }
}
