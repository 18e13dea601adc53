//! Public test network. Same consensus rules as production with its own
//! genesis, anchors and network identity.

use rtid_types::consensus::ConsensusRules;
use rtid_types::constants::*;
use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;
use rtid_types::primitives::*;
use rtid_types::uint256::U256;

use crate::genesis::{build_genesis, GenesisLiterals, GenesisPins};
use crate::mainnet;
use crate::params::{Base58Prefixes, ChainParams, ChainTxData, Checkpoints};
use crate::seeds::test_fixed_seeds;

pub const GENESIS: GenesisLiterals = GenesisLiterals {
    time: TEST_GENESIS_TIME,
    nonce: TEST_GENESIS_NONCE,
    bits: TEST_GENESIS_BITS,
    version: GENESIS_VERSION,
    reward: GENESIS_REWARD,
};

pub const GENESIS_PINS: GenesisPins = GenesisPins {
    pow_hash: "8fb7e39abb1ee7ff35c92748166124b352077856424ab7d0ac93d431909345a4",
    block_hash: "761c89c87c7c9eedc69d3782ec28cc2b997d023254e1bd420ff70deb78ca5d2e",
    merkle_root: "f937149a8538d3a3c7274cfdd054017a3f3dca99f98b590491beb1fa13a0d12a",
};

pub const ANCHOR_HEIGHT: Height = 780_301;
pub const MINIMUM_CHAIN_WORK: &str = "39d585c9";
pub const DEFAULT_ASSUME_VALID: &str =
    "e87ec8451768ddadc3364b48efdc8f47b79e7723eb69c75ae3e7083bf48985b1";

fn consensus_rules(hash_genesis_block: Hash) -> Result<ConsensusRules, RtidError> {
    Ok(ConsensusRules {
        // Not yet recorded for this network.
        bip34_hash: ZERO_HASH,
        minimum_chain_work: U256::from_hex(MINIMUM_CHAIN_WORK)?,
        default_assume_valid: hash_from_hex(DEFAULT_ASSUME_VALID)?,
        ..mainnet::consensus_rules(hash_genesis_block)?
    })
}

/// Build and verify the public test network parameters.
pub fn params() -> Result<ChainParams, RtidError> {
    let (genesis, genesis_hashes) = build_genesis(NetworkId::Test, &GENESIS, &GENESIS_PINS)?;
    let consensus = consensus_rules(genesis_hashes.block_hash)?;
    consensus.check_pow_limit(PUBLIC_POW_LIMIT_RATIO)?;

    Ok(ChainParams {
        network: NetworkId::Test,
        consensus,
        message_start: [0x84, 0xda, 0xb5, 0xb4],
        default_port: 44230,
        prune_after_height: 1000,
        dns_seeds: vec!["1seed-testnet.cryptozeny.com".to_string()],
        fixed_seeds: test_fixed_seeds(),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![66],
            script_address: vec![128],
            secret_key: vec![239],
            ext_public_key: vec![0x04, 0x35, 0x87, 0xcf],
            ext_secret_key: vec![0x04, 0x35, 0x83, 0x94],
        },
        bech32_hrp: "trid".to_string(),
        checkpoints: Checkpoints::new([(0, genesis_hashes.block_hash)]),
        chain_tx_data: ChainTxData::default(),
        genesis,
        genesis_hashes,
        default_consistency_checks: false,
        require_standard: false,
        mine_blocks_on_demand: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::verify_genesis;
    use crate::genesis::{create_genesis_block, genesis_output_script};
    use rtid_types::error::GenesisField;

    #[test]
    fn test_testnet_genesis_matches_pins() {
        let params = params().unwrap();
        assert_eq!(params.network_id(), "test");
        assert_eq!(hash_to_hex(&params.genesis_hash()), GENESIS_PINS.block_hash);
        assert_eq!(params.genesis.header.nonce, 490);
    }

    #[test]
    fn test_testnet_other_nonce_or_time_fails() {
        let script = genesis_output_script().unwrap();
        for literals in [
            GenesisLiterals { nonce: 491, ..GENESIS },
            GenesisLiterals {
                time: TEST_GENESIS_TIME + 1,
                ..GENESIS
            },
        ] {
            let block = create_genesis_block(GENESIS_TIMESTAMP, &script, &literals).unwrap();
            let err = verify_genesis(NetworkId::Test, &block, &GENESIS_PINS).unwrap_err();
            assert!(matches!(
                err,
                RtidError::GenesisMismatch {
                    field: GenesisField::PowHash,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_testnet_shares_main_rules() {
        let params = params().unwrap();
        let main_rules = mainnet::consensus_rules(params.genesis_hash()).unwrap();
        assert_eq!(params.consensus.pow_limit, main_rules.pow_limit);
        assert_eq!(params.consensus.deployments, main_rules.deployments);
        assert_eq!(params.consensus.bip34_hash, ZERO_HASH);
        assert_ne!(
            params.consensus.default_assume_valid,
            main_rules.default_assume_valid
        );
    }
}
