//! Production network.

use rtid_types::consensus::{ConsensusRules, Deployment, Deployments};
use rtid_types::constants::*;
use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;
use rtid_types::primitives::*;
use rtid_types::uint256::U256;

use crate::genesis::{build_genesis, GenesisLiterals, GenesisPins};
use crate::params::{Base58Prefixes, ChainParams, ChainTxData, Checkpoints};
use crate::seeds::main_fixed_seeds;

pub const GENESIS: GenesisLiterals = GenesisLiterals {
    time: MAIN_GENESIS_TIME,
    nonce: MAIN_GENESIS_NONCE,
    bits: MAIN_GENESIS_BITS,
    version: GENESIS_VERSION,
    reward: GENESIS_REWARD,
};

pub const GENESIS_PINS: GenesisPins = GenesisPins {
    pow_hash: "daf38f9985d221ec7cc10afd04a52bd31fc96f689daab535047564545207cbe0",
    block_hash: "e68d15e76fdb521ab446135997d4820bdf8f8c99ff279720ccdaccb3da908c23",
    merkle_root: "f937149a8538d3a3c7274cfdd054017a3f3dca99f98b590491beb1fa13a0d12a",
};

/// Easiest target on the public networks, `U256::MAX / 1024`.
pub const POW_LIMIT: &str = "003fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

// ─── Chain Anchors ───────────────────────────────────────────────────────────
//
// Both values describe the block at ANCHOR_HEIGHT and move together when the
// anchor is advanced.

/// Height the work and assume-valid anchors were taken at.
pub const ANCHOR_HEIGHT: Height = 2_601_001;
pub const MINIMUM_CHAIN_WORK: &str = "0b63a48c5c1e";
pub const DEFAULT_ASSUME_VALID: &str =
    "56e8f536feb26f749ed9198f56f397da08f018de9518674b2ac12a41061612cb";

/// Consensus rules shared by the production and public test networks.
pub(crate) fn consensus_rules(hash_genesis_block: Hash) -> Result<ConsensusRules, RtidError> {
    Ok(ConsensusRules {
        subsidy_halving_interval: 12_500_000,
        bip16_height: 0,
        bip34_height: 17,
        bip34_hash: hash_from_hex(
            "72e36f3fcdf98d3625dfe03f28a914c513b913231e479d53fc22e5e46cf5b585",
        )?,
        bip65_height: 0,
        bip66_height: 0,
        pow_limit: U256::from_hex(POW_LIMIT)?,
        pow_target_spacing: 5,
        pow_target_timespan: 61_200,
        pow_averaging_window: 510,
        pow_max_adjust_up: 16,
        pow_max_adjust_down: 32,
        pow_allow_min_difficulty_blocks: false,
        pow_allow_min_difficulty_blocks_after_height: None,
        pow_no_retargeting: false,
        // 75% of the confirmation window.
        rule_change_activation_threshold: 9180,
        miner_confirmation_window: 12_240,
        deployments: Deployments::new(
            Deployment {
                bit: 28,
                start_time: 1_199_145_601,
                timeout: 1_230_767_999,
            },
            Deployment {
                bit: 0,
                start_time: Deployment::ALWAYS_ACTIVE,
                timeout: Deployment::NO_TIMEOUT,
            },
            Deployment {
                bit: 1,
                start_time: Deployment::ALWAYS_ACTIVE,
                timeout: Deployment::NO_TIMEOUT,
            },
        ),
        minimum_chain_work: U256::from_hex(MINIMUM_CHAIN_WORK)?,
        default_assume_valid: hash_from_hex(DEFAULT_ASSUME_VALID)?,
        hash_genesis_block,
    })
}

/// Build and verify the production network parameters.
pub fn params() -> Result<ChainParams, RtidError> {
    let (genesis, genesis_hashes) = build_genesis(NetworkId::Main, &GENESIS, &GENESIS_PINS)?;
    let consensus = consensus_rules(genesis_hashes.block_hash)?;
    consensus.check_pow_limit(PUBLIC_POW_LIMIT_RATIO)?;

    Ok(ChainParams {
        network: NetworkId::Main,
        consensus,
        message_start: [0xa1, 0x98, 0xd9, 0xdb],
        default_port: 34230,
        prune_after_height: 100_000,
        dns_seeds: vec![
            "1seed.rtidchain.com".to_string(),
            "2seed.rtidchain.com".to_string(),
        ],
        fixed_seeds: main_fixed_seeds(),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![60],
            script_address: vec![122],
            secret_key: vec![128],
            ext_public_key: vec![0x04, 0x88, 0xb2, 0x1e],
            ext_secret_key: vec![0x04, 0x88, 0xad, 0xe4],
        },
        bech32_hrp: "rtid".to_string(),
        checkpoints: Checkpoints::new([(0, genesis_hashes.block_hash)]),
        chain_tx_data: ChainTxData::default(),
        genesis,
        genesis_hashes,
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_params() {
        let params = params().unwrap();
        assert_eq!(params.network_id(), "main");
        assert_eq!(hash_to_hex(&params.genesis_hash()), GENESIS_PINS.block_hash);
        assert_eq!(params.default_port, 34230);
        assert_eq!(params.bech32_hrp, "rtid");
        assert_eq!(
            params.checkpoints.get(0),
            Some(&params.consensus.hash_genesis_block)
        );
        assert!(params.require_standard);
        assert!(!params.mine_blocks_on_demand);
    }

    #[test]
    fn test_main_consensus_knobs() {
        let rules = consensus_rules(ZERO_HASH).unwrap();
        assert_eq!(rules.pow_averaging_window, 510);
        assert_eq!(rules.pow_target_spacing, 5);
        assert_eq!(rules.difficulty_adjustment_interval(), 12_240);
        assert_eq!(U256::MAX / rules.pow_limit, U256::from(1024u64));
        assert!(rules.check_pow_limit(PUBLIC_POW_LIMIT_RATIO).is_ok());
        assert_eq!(
            rules.minimum_chain_work.to_hex(),
            "00000000000000000000000000000000000000000000000000000b63a48c5c1e"
        );
    }
}
