use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// User-visible failures. Display strings double as the `error` field of
/// HTTP 400 responses, so they stay stable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid transaction")]
    InvalidTransaction,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Invalid peer URL")]
    InvalidPeerUrl,
    #[error("Block rejected")]
    BlockRejected,
}
