//! Canonical block content encoding and digest
//!
//! A block's identity is the SHA-256 of `(transactions, previous_hash, proof)`
//! encoded as:
//!
//! ```text
//! u64 tx_count
//! per tx: u64 len | sender utf-8 | u64 len | recipient utf-8 | u64 amount
//! previous_hash (32 raw bytes)
//! u64 proof
//! ```
//!
//! All integers are big-endian. The block index is not part of the content.

use crate::core::Transaction;
use crate::utils::{hex_encode, sha256_digest};
use serde::{Serialize, Serializer};
use std::fmt;

const HASH_LEN: usize = crate::utils::crypto::SHA256_LEN;

/// Fixed-length SHA-256 digest of a block's canonical content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash([u8; HASH_LEN]);

impl BlockHash {
    /// All-zero digest used as the genesis block's `previous_hash`
    pub const SENTINEL: BlockHash = BlockHash([0u8; HASH_LEN]);

    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> BlockHash {
        BlockHash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Number of leading `'0'` characters in the hex rendering
    pub fn leading_zero_nibbles(&self) -> u32 {
        let mut count = 0;
        for byte in self.0 {
            if byte == 0 {
                count += 2;
                continue;
            }
            if byte >> 4 == 0 {
                count += 1;
            }
            break;
        }
        count
    }

    /// Difficulty predicate: the hex digest begins with `difficulty` zeros
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.leading_zero_nibbles() >= difficulty
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend((s.len() as u64).to_be_bytes());
    buf.extend(s.as_bytes());
}

/// Encodes everything that precedes the proof in the canonical content.
///
/// Proof-of-work search reuses this prefix across attempts.
pub fn content_prefix(transactions: &[Transaction], previous_hash: &BlockHash) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend((transactions.len() as u64).to_be_bytes());
    for tx in transactions {
        put_str(&mut buf, tx.get_sender());
        put_str(&mut buf, tx.get_recipient());
        buf.extend(tx.get_amount().to_be_bytes());
    }
    buf.extend(previous_hash.as_bytes());
    buf
}

pub fn canonical_content(
    transactions: &[Transaction],
    previous_hash: &BlockHash,
    proof: u64,
) -> Vec<u8> {
    let mut buf = content_prefix(transactions, previous_hash);
    buf.extend(proof.to_be_bytes());
    buf
}

pub fn digest(content: &[u8]) -> BlockHash {
    BlockHash(sha256_digest(content))
}

/// Digest of `(transactions, previous_hash, proof)`
pub fn hash_content(
    transactions: &[Transaction],
    previous_hash: &BlockHash,
    proof: u64,
) -> BlockHash {
    digest(&canonical_content(transactions, previous_hash, proof))
}
