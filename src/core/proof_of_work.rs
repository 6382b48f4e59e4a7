use crate::core::hasher::{self, BlockHash};
use crate::core::Transaction;
use crate::error::{LedgerError, Result};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default number of leading hex zeros required of a block hash
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Largest meaningful difficulty: a SHA-256 hex digest has 64 characters
pub const MAX_DIFFICULTY: u32 = 64;

/// Optional limits on a proof-of-work search.
///
/// The default places no limit, so the search runs until it finds a proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiningControl<'a> {
    cancel: Option<&'a AtomicBool>,
    max_attempts: Option<u64>,
}

impl<'a> MiningControl<'a> {
    pub fn new() -> MiningControl<'a> {
        MiningControl::default()
    }

    /// Stop the search once `flag` is set; polled between hash attempts
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> MiningControl<'a> {
        self.cancel = Some(flag);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> MiningControl<'a> {
        self.max_attempts = max_attempts;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

pub struct ProofOfWork {
    prefix: Vec<u8>,
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new_proof_of_work(
        previous_hash: &BlockHash,
        transactions: &[Transaction],
        difficulty: u32,
    ) -> ProofOfWork {
        ProofOfWork {
            prefix: hasher::content_prefix(transactions, previous_hash),
            difficulty,
        }
    }

    /// Recompute the digest once and re-apply the difficulty predicate
    pub fn validate(
        previous_hash: &BlockHash,
        transactions: &[Transaction],
        proof: u64,
        difficulty: u32,
    ) -> bool {
        ProofOfWork::new_proof_of_work(previous_hash, transactions, difficulty).check(proof)
    }

    fn prepare_data(&self, proof: u64) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.prefix.len() + 8);
        data.extend_from_slice(&self.prefix);
        data.extend(proof.to_be_bytes());
        data
    }

    pub fn check(&self, proof: u64) -> bool {
        hasher::digest(&self.prepare_data(proof)).meets_difficulty(self.difficulty)
    }

    /// Search proofs from zero upward until one satisfies the difficulty.
    ///
    /// Unbounded; blocks the calling thread.
    pub fn run(&self) -> u64 {
        let mut proof = 0;
        while !self.check(proof) {
            proof += 1;
        }
        debug!("Found proof {proof} at difficulty {}", self.difficulty);
        proof
    }

    /// Same search as [`run`](Self::run), honouring the limits in `control`
    pub fn run_with(&self, control: &MiningControl<'_>) -> Result<u64> {
        let mut proof = 0;
        loop {
            if control.is_cancelled() {
                return Err(LedgerError::MiningCancelled { attempts: proof });
            }
            if let Some(max) = control.max_attempts {
                if proof >= max {
                    return Err(LedgerError::MiningTimeout { attempts: proof });
                }
            }
            if self.check(proof) {
                debug!("Found proof {proof} at difficulty {}", self.difficulty);
                return Ok(proof);
            }
            proof += 1;
        }
    }
}

/// Find the first proof for `(previous_hash, transactions)` at `difficulty`
pub fn mine(previous_hash: &BlockHash, transactions: &[Transaction], difficulty: u32) -> u64 {
    ProofOfWork::new_proof_of_work(previous_hash, transactions, difficulty).run()
}

pub fn verify(
    previous_hash: &BlockHash,
    transactions: &[Transaction],
    proof: u64,
    difficulty: u32,
) -> bool {
    ProofOfWork::validate(previous_hash, transactions, proof, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_transactions() -> Vec<Transaction> {
        vec![
            Transaction::new("alice", "bob", 5),
            Transaction::new_reward("miner", 10),
        ]
    }

    #[test]
    fn test_mined_proof_validates() {
        let txs = test_transactions();
        let proof = mine(&BlockHash::SENTINEL, &txs, 2);

        assert!(verify(&BlockHash::SENTINEL, &txs, proof, 2));
        assert!(hasher::hash_content(&txs, &BlockHash::SENTINEL, proof)
            .to_hex()
            .starts_with("00"));
    }

    #[test]
    fn test_mine_returns_first_satisfying_proof() {
        let txs = test_transactions();
        let proof = mine(&BlockHash::SENTINEL, &txs, 2);

        for earlier in 0..proof {
            assert!(!verify(&BlockHash::SENTINEL, &txs, earlier, 2));
        }
    }

    #[test]
    fn test_difficulty_zero_accepts_first_proof() {
        assert_eq!(mine(&BlockHash::SENTINEL, &[], 0), 0);
    }

    #[test]
    fn test_prepare_data_consistency() {
        let txs = test_transactions();
        let pow = ProofOfWork::new_proof_of_work(&BlockHash::SENTINEL, &txs, 2);

        assert_eq!(pow.prepare_data(12345), pow.prepare_data(12345));
        assert_ne!(pow.prepare_data(12345), pow.prepare_data(54321));
        assert_eq!(
            pow.prepare_data(12345),
            hasher::canonical_content(&txs, &BlockHash::SENTINEL, 12345)
        );
    }

    #[test]
    fn test_run_with_no_limits_matches_run() {
        let txs = test_transactions();
        let pow = ProofOfWork::new_proof_of_work(&BlockHash::SENTINEL, &txs, 2);
        assert_eq!(pow.run_with(&MiningControl::new()), Ok(pow.run()));
    }

    #[test]
    fn test_cancelled_search() {
        let flag = AtomicBool::new(true);
        let pow = ProofOfWork::new_proof_of_work(&BlockHash::SENTINEL, &[], MAX_DIFFICULTY);
        let result = pow.run_with(&MiningControl::new().with_cancel(&flag));
        assert_eq!(result, Err(LedgerError::MiningCancelled { attempts: 0 }));
    }

    #[test]
    fn test_bounded_search_times_out() {
        let pow = ProofOfWork::new_proof_of_work(&BlockHash::SENTINEL, &[], MAX_DIFFICULTY);
        let result = pow.run_with(&MiningControl::new().with_max_attempts(Some(50)));
        assert_eq!(result, Err(LedgerError::MiningTimeout { attempts: 50 }));
    }
}
