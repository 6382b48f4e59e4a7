//! Configuration management
//!
//! This module handles the settings a ledger instance is built from:
//! mining difficulty, reward size, the default miner, and an optional
//! bound on proof-of-work attempts.

pub mod settings;

pub use settings::Config;
