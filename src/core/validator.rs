//! Full-chain integrity check
//!
//! Walks every block after genesis and confirms that it is at the right
//! index, that it links to the digest of its predecessor, and that its proof
//! meets the difficulty. The first failing block is reported; nothing is
//! mutated.

use crate::core::hasher::BlockHash;
use crate::core::{Block, ProofOfWork};
use log::warn;
use std::fmt;

/// What went wrong at a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Stored index differs from the block's position
    IndexMismatch { expected: usize, found: usize },
    /// `previous_hash` is not the digest of the preceding block
    BrokenLink { expected: BlockHash, found: BlockHash },
    /// Proof does not satisfy the difficulty for this content
    InvalidProof,
}

/// Diagnostic for the first block that fails validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    pub index: usize,
    pub kind: ViolationKind,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::IndexMismatch { expected, found } => write!(
                f,
                "block {}: index {found} stored where {expected} expected",
                self.index
            ),
            ViolationKind::BrokenLink { expected, found } => write!(
                f,
                "block {}: previous_hash {found} does not match predecessor digest {expected}",
                self.index
            ),
            ViolationKind::InvalidProof => {
                write!(f, "block {}: invalid proof of work", self.index)
            }
        }
    }
}

pub struct ChainValidator {
    difficulty: u32,
}

impl ChainValidator {
    pub fn new(difficulty: u32) -> ChainValidator {
        ChainValidator { difficulty }
    }

    pub fn is_valid(&self, blocks: &[Block]) -> bool {
        self.validate(blocks).is_ok()
    }

    /// Validate `blocks`, returning the first violation found
    pub fn validate(&self, blocks: &[Block]) -> Result<(), IntegrityViolation> {
        for (i, block) in blocks.iter().enumerate() {
            if block.get_index() != i {
                return Err(Self::report(
                    i,
                    ViolationKind::IndexMismatch {
                        expected: i,
                        found: block.get_index(),
                    },
                ));
            }

            // Genesis is trusted by construction
            if i == 0 {
                continue;
            }

            let expected = blocks[i - 1].hash();
            if block.get_previous_hash() != &expected {
                return Err(Self::report(
                    i,
                    ViolationKind::BrokenLink {
                        expected,
                        found: *block.get_previous_hash(),
                    },
                ));
            }

            if !ProofOfWork::validate(
                block.get_previous_hash(),
                block.get_transactions(),
                block.get_proof(),
                self.difficulty,
            ) {
                return Err(Self::report(i, ViolationKind::InvalidProof));
            }
        }
        Ok(())
    }

    fn report(index: usize, kind: ViolationKind) -> IntegrityViolation {
        let violation = IntegrityViolation { index, kind };
        warn!("Chain integrity violation: {violation}");
        violation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{proof_of_work, Blockchain, Transaction};

    const DIFFICULTY: u32 = 2;

    fn chain_with_blocks(count: usize) -> Blockchain {
        let mut chain = Blockchain::new_blockchain(DIFFICULTY);
        for n in 0..count {
            let txs = vec![Transaction::new_reward("miner", 10 + n as u64)];
            let previous_hash = chain.last_block().hash();
            let proof = proof_of_work::mine(&previous_hash, &txs, DIFFICULTY);
            chain
                .append(Block::new_block(chain.len(), txs, previous_hash, proof))
                .unwrap();
        }
        chain
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let chain = Blockchain::new_blockchain(DIFFICULTY);
        assert!(ChainValidator::new(DIFFICULTY).is_valid(chain.blocks()));
    }

    #[test]
    fn test_mined_chain_is_valid() {
        let chain = chain_with_blocks(3);
        let validator = ChainValidator::new(DIFFICULTY);
        assert_eq!(validator.validate(chain.blocks()), Ok(()));
        assert!(validator.is_valid(chain.blocks()));
    }

    #[test]
    fn test_tampered_block_is_detected() {
        let mut chain = chain_with_blocks(3);
        chain
            .tamper(1, vec![Transaction::new("Hacker", "Evil", 9999)])
            .unwrap();

        let violation = ChainValidator::new(DIFFICULTY)
            .validate(chain.blocks())
            .unwrap_err();
        // Either the block's own proof no longer fits, or its successor's link breaks
        assert!(matches!(
            (violation.index, &violation.kind),
            (1, ViolationKind::InvalidProof) | (2, ViolationKind::BrokenLink { .. })
        ));
    }

    #[test]
    fn test_forged_content_with_valid_proof_breaks_successor_link() {
        let mut chain = chain_with_blocks(3);
        let block = chain.get(1).unwrap().clone();
        // Look for altered content that still meets the difficulty with the
        // existing proof, so only the successor's link can catch it
        let forged = (0u64..)
            .map(|amount| vec![Transaction::new("Hacker", "Evil", amount)])
            .find(|txs| {
                ProofOfWork::validate(
                    block.get_previous_hash(),
                    txs,
                    block.get_proof(),
                    DIFFICULTY,
                )
            })
            .unwrap();
        chain.tamper(1, forged).unwrap();

        let violation = ChainValidator::new(DIFFICULTY)
            .validate(chain.blocks())
            .unwrap_err();
        assert_eq!(violation.index, 2);
        match violation.kind {
            ViolationKind::BrokenLink { expected, found } => {
                assert_eq!(expected, chain.get(1).unwrap().hash());
                assert_eq!(found, block.hash());
            }
            other => panic!("unexpected violation {other:?}"),
        }
    }

    #[test]
    fn test_tampered_tip_fails_proof() {
        let mut chain = chain_with_blocks(2);
        let tip = chain.len() - 1;
        // Raise the amount until the tampered content misses the difficulty
        let altered = (1u64..)
            .map(|amount| vec![Transaction::new_reward("miner", 1_000 + amount)])
            .find(|txs| {
                let block = chain.get(tip).unwrap();
                !ProofOfWork::validate(
                    block.get_previous_hash(),
                    txs,
                    block.get_proof(),
                    DIFFICULTY,
                )
            })
            .unwrap();
        chain.tamper(tip, altered).unwrap();

        let violation = ChainValidator::new(DIFFICULTY)
            .validate(chain.blocks())
            .unwrap_err();
        assert_eq!(violation.index, tip);
        assert_eq!(violation.kind, ViolationKind::InvalidProof);
    }

    #[test]
    fn test_index_mismatch_detected() {
        let chain = chain_with_blocks(1);
        let mut blocks = chain.blocks().to_vec();
        let moved = blocks[1].clone();
        blocks[1] = Block::new_block(
            7,
            moved.get_transactions().to_vec(),
            *moved.get_previous_hash(),
            moved.get_proof(),
        );

        let violation = ChainValidator::new(DIFFICULTY).validate(&blocks).unwrap_err();
        assert_eq!(
            violation.kind,
            ViolationKind::IndexMismatch {
                expected: 1,
                found: 7
            }
        );
    }

    #[test]
    fn test_stricter_difficulty_rejects_chain() {
        let chain = chain_with_blocks(4);
        // Chains mined at difficulty 2 will almost surely contain a block
        // that does not also meet difficulty 8
        assert!(!ChainValidator::new(8).is_valid(chain.blocks()));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let chain = chain_with_blocks(2);
        let before = chain.blocks().to_vec();
        let validator = ChainValidator::new(DIFFICULTY);

        assert!(validator.is_valid(chain.blocks()));
        assert!(validator.is_valid(chain.blocks()));
        assert_eq!(chain.blocks(), before.as_slice());
    }
}
