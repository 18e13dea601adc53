pub mod consensus;
pub mod constants;
pub mod error;
pub mod network;
pub mod primitives;
pub mod uint256;
