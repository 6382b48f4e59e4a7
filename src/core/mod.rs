//! Core ledger functionality
//!
//! This module contains the chain-integrity and consensus engine: the
//! hasher, transactions, blocks, the chain store, proof-of-work, the
//! mining orchestrator and the full-chain validator.

pub mod block;
pub mod blockchain;
pub mod hasher;
pub mod ledger;
pub mod proof_of_work;
pub mod transaction;
pub mod validator;

pub use block::{Block, GENESIS_PROOF};
pub use blockchain::{BalanceDetails, Blockchain};
pub use hasher::BlockHash;
pub use ledger::Ledger;
pub use proof_of_work::{MiningControl, ProofOfWork, DEFAULT_DIFFICULTY, MAX_DIFFICULTY};
pub use transaction::{Amount, Balance, Transaction, REWARD_SENDER};
pub use validator::{ChainValidator, IntegrityViolation, ViolationKind};
