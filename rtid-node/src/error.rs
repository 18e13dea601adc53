use rtid_types::error::RtidError;
use thiserror::Error;

/// Errors surfaced by the `rtid` binary.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {reason}")]
    ConfigError { reason: String },

    #[error("chain parameters: {0}")]
    Params(#[from] RtidError),

    #[error("output error: {reason}")]
    OutputError { reason: String },

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
