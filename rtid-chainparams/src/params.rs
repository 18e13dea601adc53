use std::collections::BTreeMap;

use bitcoin::Block;
use rtid_types::consensus::ConsensusRules;
use rtid_types::network::NetworkId;
use rtid_types::primitives::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::genesis::GenesisHashes;
use crate::seeds::SeedSpec;

/// Version bytes prepended by the address codec, one entry per address class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Base58Prefixes {
    #[serde(with = "serde_hex")]
    pub pubkey_address: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub script_address: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub secret_key: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub ext_public_key: Vec<u8>,
    #[serde(with = "serde_hex")]
    pub ext_secret_key: Vec<u8>,
}

/// Height to block-hash pins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoints(BTreeMap<Height, Hash>);

impl Checkpoints {
    pub fn new(entries: impl IntoIterator<Item = (Height, Hash)>) -> Self {
        Self(entries.into_iter().collect())
    }

    pub fn get(&self, height: Height) -> Option<&Hash> {
        self.0.get(&height)
    }

    /// Highest pinned height, if any.
    pub fn last_height(&self) -> Option<Height> {
        self.0.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Height, &Hash)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Checkpoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (height, hash) in &self.0 {
            map.serialize_entry(height, &hash_to_hex(hash))?;
        }
        map.end()
    }
}

/// Snapshot of chain activity used to estimate verification progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChainTxData {
    /// Unix time of the last known transaction count.
    pub time: i64,
    /// Total transactions up to that time.
    pub tx_count: u64,
    /// Estimated transactions per second after that time.
    pub tx_rate: f64,
}

/// Everything that identifies one network.
///
/// Built once by [`crate::create_chain_params`] and read-only afterwards;
/// the only mutation is a deployment window patch on the registry's copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainParams {
    pub network: NetworkId,
    pub consensus: ConsensusRules,
    /// Prefix of every wire message on this network.
    #[serde(with = "serde_hex")]
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub dns_seeds: Vec<String>,
    pub fixed_seeds: Vec<SeedSpec>,
    pub base58_prefixes: Base58Prefixes,
    pub bech32_hrp: String,
    pub genesis: Block,
    pub genesis_hashes: GenesisHashes,
    pub checkpoints: Checkpoints,
    pub chain_tx_data: ChainTxData,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
}

impl ChainParams {
    /// Network identifier string: `"main"`, `"test"` or `"regtest"`.
    pub fn network_id(&self) -> &'static str {
        self.network.as_str()
    }

    pub fn consensus(&self) -> &ConsensusRules {
        &self.consensus
    }

    pub fn genesis_block(&self) -> &Block {
        &self.genesis
    }

    /// Double-SHA256 identifier of the genesis block.
    pub fn genesis_hash(&self) -> Hash {
        self.consensus.hash_genesis_block
    }

    /// Whether this is one of the test networks.
    pub fn is_test_chain(&self) -> bool {
        self.network != NetworkId::Main
    }
}
