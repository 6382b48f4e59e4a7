//! Utility functions and helpers
//!
//! This module contains the hashing and encoding primitives the ledger
//! is built on.

pub mod crypto;

pub use crypto::{hex_encode, sha256_digest};
