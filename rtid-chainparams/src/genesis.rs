use bitcoin::block::{self, Block, Header};
use bitcoin::hashes::{sha256d, Hash as _};
use bitcoin::opcodes::all::OP_CHECKSIG;
use bitcoin::script::{self, PushBytesBuf, ScriptBuf};
use bitcoin::transaction::{self, OutPoint, Sequence, Transaction, TxIn, TxOut};
use bitcoin::locktime::absolute;
use bitcoin::{Amount, BlockHash, CompactTarget, TxMerkleNode, Witness};
use rtid_crypto::yespower::pow_hash;
use rtid_types::constants::*;
use rtid_types::error::{GenesisField, RtidError};
use rtid_types::network::NetworkId;
use rtid_types::primitives::*;
use serde::Serialize;
use tracing::debug;

/// Header literals of one network's genesis block.
///
/// These are found offline by grinding the nonce until the proof-of-work
/// hash meets `bits`; nothing here searches for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenesisLiterals {
    pub time: BlockTime,
    pub nonce: u32,
    pub bits: u32,
    pub version: i32,
    /// Coinbase value in satoshi-sized base units.
    pub reward: u64,
}

/// Expected hashes of a genesis block, in display-order hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenesisPins {
    pub pow_hash: &'static str,
    pub block_hash: &'static str,
    pub merkle_root: &'static str,
}

/// Hashes recomputed from a genesis block that matched its pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenesisHashes {
    #[serde(with = "serde_hash")]
    pub pow_hash: Hash,
    #[serde(with = "serde_hash")]
    pub block_hash: Hash,
    #[serde(with = "serde_hash")]
    pub merkle_root: Hash,
}

fn push_bytes(what: &str, bytes: Vec<u8>) -> Result<PushBytesBuf, RtidError> {
    PushBytesBuf::try_from(bytes).map_err(|e| RtidError::InvalidGenesis {
        reason: format!("{}: {}", what, e),
    })
}

/// Pay-to-pubkey script of the genesis output.
pub fn genesis_output_script() -> Result<ScriptBuf, RtidError> {
    let pubkey = hex::decode(GENESIS_OUTPUT_PUBKEY).map_err(|e| RtidError::InvalidHex {
        reason: format!("genesis output pubkey: {}", e),
    })?;
    Ok(script::Builder::new()
        .push_slice(push_bytes("genesis output pubkey", pubkey)?)
        .push_opcode(OP_CHECKSIG)
        .into_script())
}

fn genesis_coinbase(
    timestamp: &str,
    output_script: &ScriptBuf,
    reward: u64,
) -> Result<Transaction, RtidError> {
    // Same encoding as `Builder::push_int_non_minimal`, which is not public.
    let mut extra_nonce = [0u8; 8];
    let extra_nonce_len = script::write_scriptint(&mut extra_nonce, GENESIS_SCRIPT_EXTRA_NONCE);
    let extra_nonce: &script::PushBytes = (&extra_nonce[..extra_nonce_len])
        .try_into()
        .expect("at most 8 bytes is always a valid push");
    let script_sig = script::Builder::new()
        .push_int(GENESIS_SCRIPT_MARKER)
        .push_slice(extra_nonce)
        .push_slice(push_bytes("genesis timestamp", timestamp.as_bytes().to_vec())?)
        .into_script();

    Ok(Transaction {
        version: transaction::Version::ONE,
        lock_time: absolute::LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: Sequence::MAX,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(reward),
            script_pubkey: output_script.clone(),
        }],
    })
}

/// Build a genesis block from its literal inputs.
///
/// The single coinbase input carries the legacy difficulty marker, a small
/// number and `timestamp`; the single output pays `literals.reward` to
/// `output_script`. The merkle root is therefore the coinbase txid.
pub fn create_genesis_block(
    timestamp: &str,
    output_script: &ScriptBuf,
    literals: &GenesisLiterals,
) -> Result<Block, RtidError> {
    let txdata = vec![genesis_coinbase(timestamp, output_script, literals.reward)?];
    let txid: sha256d::Hash = txdata[0].compute_txid().into();

    Ok(Block {
        header: Header {
            version: block::Version::from_consensus(literals.version),
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::from(txid),
            time: literals.time,
            bits: CompactTarget::from_consensus(literals.bits),
            nonce: literals.nonce,
        },
        txdata,
    })
}

/// Recompute the genesis hashes and compare them against the pins.
///
/// Checks run in the order proof-of-work hash, block hash, merkle root and
/// the first mismatch is returned.
pub fn verify_genesis(
    network: NetworkId,
    block: &Block,
    pins: &GenesisPins,
) -> Result<GenesisHashes, RtidError> {
    let merkle_root = block
        .compute_merkle_root()
        .ok_or_else(|| RtidError::InvalidGenesis {
            reason: "block has no transactions".to_string(),
        })?;
    let hashes = GenesisHashes {
        pow_hash: pow_hash(&block.header)?,
        block_hash: block.block_hash().to_byte_array(),
        merkle_root: merkle_root.to_byte_array(),
    };

    check_pin(network, GenesisField::PowHash, pins.pow_hash, &hashes.pow_hash)?;
    check_pin(network, GenesisField::BlockHash, pins.block_hash, &hashes.block_hash)?;
    check_pin(network, GenesisField::MerkleRoot, pins.merkle_root, &hashes.merkle_root)?;

    debug!(
        network = network.as_str(),
        block_hash = %hash_to_hex(&hashes.block_hash),
        pow_hash = %hash_to_hex(&hashes.pow_hash),
        "genesis block verified"
    );
    Ok(hashes)
}

/// Build the chain's genesis block for `literals` and verify it.
pub fn build_genesis(
    network: NetworkId,
    literals: &GenesisLiterals,
    pins: &GenesisPins,
) -> Result<(Block, GenesisHashes), RtidError> {
    let block = create_genesis_block(GENESIS_TIMESTAMP, &genesis_output_script()?, literals)?;
    let hashes = verify_genesis(network, &block, pins)?;
    Ok((block, hashes))
}

fn check_pin(
    network: NetworkId,
    field: GenesisField,
    expected: &str,
    actual: &Hash,
) -> Result<(), RtidError> {
    if hash_from_hex(expected)? != *actual {
        return Err(RtidError::GenesisMismatch {
            network: network.as_str().to_string(),
            field,
            expected: expected.to_string(),
            actual: hash_to_hex(actual),
        });
    }
    Ok(())
}
