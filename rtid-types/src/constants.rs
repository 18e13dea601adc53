use crate::primitives::BlockTime;

// ─── Genesis Block ───────────────────────────────────────────────────────────

/// Headline embedded in the genesis coinbase unlock script.
pub const GENESIS_TIMESTAMP: &str = "The Times 10/April/2020 We Can Change The World";

/// Uncompressed public key paid by the genesis coinbase output.
pub const GENESIS_OUTPUT_PUBKEY: &str = "04678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5f";

/// Genesis coinbase value in satoshi-sized base units (2^32, about 42.9 coins).
pub const GENESIS_REWARD: u64 = 4_294_967_296;

/// Legacy difficulty marker pushed first in the genesis unlock script.
/// It is `0x1d00ffff`, unrelated to each network's actual `bits`.
pub const GENESIS_SCRIPT_MARKER: i64 = 486_604_799;

/// Small integer pushed after the marker.
pub const GENESIS_SCRIPT_EXTRA_NONCE: i64 = 4;

pub const GENESIS_VERSION: i32 = 1;

pub const MAIN_GENESIS_TIME: BlockTime = 1_586_433_836;
pub const MAIN_GENESIS_NONCE: u32 = 247;
pub const MAIN_GENESIS_BITS: u32 = 0x1f3f_ffff;

pub const TEST_GENESIS_TIME: BlockTime = 1_586_433_837;
pub const TEST_GENESIS_NONCE: u32 = 490;
pub const TEST_GENESIS_BITS: u32 = 0x1f3f_ffff;

pub const REGTEST_GENESIS_TIME: BlockTime = 1_586_433_838;
pub const REGTEST_GENESIS_NONCE: u32 = 9;
pub const REGTEST_GENESIS_BITS: u32 = 0x200f_0f0f;

// ─── Proof of Work ───────────────────────────────────────────────────────────

/// Yespower memory cost (N) used for the proof-of-work hash.
pub const YESPOWER_N: u32 = 2048;

/// Yespower block size (r) used for the proof-of-work hash.
pub const YESPOWER_R: u32 = 32;

/// Expected `U256::MAX / pow_limit` on the public networks.
pub const PUBLIC_POW_LIMIT_RATIO: u64 = 1024;

/// Expected `U256::MAX / pow_limit` on regtest.
pub const REGTEST_POW_LIMIT_RATIO: u64 = 17;
