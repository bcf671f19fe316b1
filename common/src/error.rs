use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Admission errors for [`crate::transaction::Transaction`], returned by
/// the pool's `add` operation. Numeric codes are part of the wire contract
/// (ExecuteResult.error_code) and must not be renumbered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxError {
    #[error("transaction already in pool")]
    Repeat,
    #[error("transaction has no sender and did not arrive from a peer")]
    SaddrNone,
    #[error("sender balance is insufficient for this transaction")]
    InsufficientBalance,
    #[error("transaction signature does not verify")]
    InvalidSignature,
}

impl TxError {
    pub fn code(self) -> u32 {
        match self {
            TxError::Repeat => 10,
            TxError::SaddrNone => 11,
            TxError::InsufficientBalance => 12,
            TxError::InvalidSignature => 13,
        }
    }
}

/// Validation errors for [`crate::block::Block`], returned by
/// `BlockChain::append`. Checked in the order below - first failure wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockError {
    #[error("block hash does not satisfy proof of work")]
    InvalidPow,
    #[error("block transaction set is malformed")]
    InvalidTx,
    #[error("block hash does not match its recomputed hash")]
    InvalidHash,
    #[error("block does not chain to the local tail")]
    InvalidPrevHash,
    #[error("block is missing or malformed")]
    InvalidData,
}

impl BlockError {
    pub fn code(self) -> u32 {
        match self {
            BlockError::InvalidPow => 20,
            BlockError::InvalidTx => 21,
            BlockError::InvalidHash => 22,
            BlockError::InvalidPrevHash => 23,
            BlockError::InvalidData => 24,
        }
    }
}

/// Either kind of validation failure, so a single `ExecuteResult` can carry
/// whichever applies without the caller needing to know which aggregate
/// produced it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error(transparent)]
    Tx(#[from] TxError),
    #[error(transparent)]
    Block(#[from] BlockError),
}

impl ErrorKind {
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::Tx(e) => e.code(),
            ErrorKind::Block(e) => e.code(),
        }
    }
}

/// Tagged outcome of a mutating operation (pool admission, block append).
/// Mirrors `ExecuteResult` from the reference implementation: validation
/// failures are returned in-band, never raised as exceptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    pub success: bool,
    pub error_code: Option<u32>,
    pub message: Option<String>,
}

impl ExecuteResult {
    pub fn ok(message: impl Into<String>) -> Self {
        ExecuteResult {
            success: true,
            error_code: None,
            message: Some(message.into()),
        }
    }

    pub fn err(kind: impl Into<ErrorKind>, message: impl Into<String>) -> Self {
        let kind = kind.into();
        ExecuteResult {
            success: false,
            error_code: Some(kind.code()),
            message: Some(message.into()),
        }
    }
}
