//! # Architect Ledger - an append-only, proof-of-work secured ledger
//!
//! Blocks are linked by the SHA-256 digest of their predecessor's content,
//! admitted only with a valid proof-of-work, and balances are always derived
//! from the committed history rather than stored.
//!
//! ## How the code is organized
//! - `core/`: hasher, transactions, blocks, the chain store, proof-of-work,
//!   the mining orchestrator (`Ledger`) and the chain validator
//! - `storage/`: the pending transaction pool
//! - `config/`: settings loaded from defaults, a TOML file and the environment
//! - `error/`: error types
//! - `utils/`: SHA-256 and hex helpers
//! - `cli/`: argument parsing and the interactive shell
//!
//! ## Typical flow
//! ```
//! use architect_ledger::Ledger;
//!
//! let mut ledger = Ledger::new(1);
//! ledger.mine("alice", 100).unwrap();
//! ledger.submit_transaction("alice", "bob", 50).unwrap();
//! ledger.mine("miner", 10).unwrap();
//!
//! assert_eq!(ledger.get_balance("bob"), 50);
//! assert!(ledger.validate_chain());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

pub use cli::{run_demo, run_shell, Command, Opt, ShellCommand};
pub use config::Config;
pub use core::{
    Amount, Balance, BalanceDetails, Block, BlockHash, Blockchain, ChainValidator,
    IntegrityViolation, Ledger, MiningControl, ProofOfWork, Transaction, ViolationKind,
    DEFAULT_DIFFICULTY, GENESIS_PROOF, REWARD_SENDER,
};
pub use error::{LedgerError, Result, TxError};
pub use storage::TransactionPool;
pub use utils::{hex_encode, sha256_digest};
