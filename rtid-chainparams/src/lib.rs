//! Per-network chain parameters.
//!
//! [`create_chain_params`] builds one network's parameter set, verifying its
//! genesis block and proof-of-work limit on the way. [`ParamsRegistry`]
//! holds the set an application has selected.

pub mod genesis;
pub mod mainnet;
pub mod overrides;
pub mod params;
pub mod regtest;
pub mod registry;
pub mod seeds;
pub mod testnet;

pub use overrides::DeploymentOverride;
pub use params::ChainParams;
pub use registry::ParamsRegistry;

use rtid_types::error::RtidError;
use rtid_types::network::NetworkId;

/// Build the parameters of `network`.
///
/// Fails with `GenesisMismatch` or `SanityViolation` if the hardcoded values
/// are inconsistent; nothing is cached.
pub fn create_chain_params(network: NetworkId) -> Result<ChainParams, RtidError> {
    match network {
        NetworkId::Main => mainnet::params(),
        NetworkId::Test => testnet::params(),
        NetworkId::Regtest => regtest::params(),
    }
}
