//! Error handling for the ledger
//!
//! Submission failures are returned as [`TxError`]; everything else that can go
//! wrong in the ledger is a [`LedgerError`]. Chain integrity problems are not
//! errors at all, the validator reports them as values.

use std::fmt;

use crate::core::{Amount, Balance};

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Reasons a transaction is refused by the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    /// Transfer amount is zero
    InvalidAmount,
    /// Sender or recipient is the reward sentinel, which only mining may use
    ReservedParticipant(String),
    /// Sender's committed balance minus pending spends does not cover the amount
    InsufficientBalance { required: Amount, available: Balance },
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::InvalidAmount => write!(f, "Invalid amount: must be greater than zero"),
            TxError::ReservedParticipant(name) => {
                write!(f, "Reserved participant: '{name}' is used only for mining rewards")
            }
            TxError::InsufficientBalance {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient balance: required {required}, available {available}"
                )
            }
        }
    }
}

impl std::error::Error for TxError {}

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Transaction rejected at submission
    Transaction(TxError),
    /// Block refused by the chain store
    InvalidBlock(String),
    /// No block at the requested index
    BlockNotFound(usize),
    /// Proof-of-work search stopped by the caller's cancel flag
    MiningCancelled { attempts: u64 },
    /// Proof-of-work search ran out of attempts
    MiningTimeout { attempts: u64 },
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(String),
    /// Serialization/deserialization errors
    Serialization(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Transaction(err) => write!(f, "Transaction error: {err}"),
            LedgerError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            LedgerError::BlockNotFound(index) => write!(f, "Block not found at index {index}"),
            LedgerError::MiningCancelled { attempts } => {
                write!(f, "Mining cancelled after {attempts} attempts")
            }
            LedgerError::MiningTimeout { attempts } => {
                write!(f, "Mining gave up after {attempts} attempts")
            }
            LedgerError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LedgerError::Io(msg) => write!(f, "I/O error: {msg}"),
            LedgerError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<TxError> for LedgerError {
    fn from(err: TxError) -> Self {
        LedgerError::Transaction(err)
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
