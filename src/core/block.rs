use crate::core::hasher::{self, BlockHash};
use crate::core::Transaction;
use serde::Serialize;

/// Fixed nonce of the genesis block; it is never searched for
pub const GENESIS_PROOF: u64 = 100;

/// A sealed block. Its own hash is never stored, it is recomputed from content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    index: usize,
    transactions: Vec<Transaction>,
    previous_hash: BlockHash,
    proof: u64,
}

impl Block {
    pub fn new_block(
        index: usize,
        transactions: Vec<Transaction>,
        previous_hash: BlockHash,
        proof: u64,
    ) -> Block {
        Block {
            index,
            transactions,
            previous_hash,
            proof,
        }
    }

    pub fn generate_genesis_block() -> Block {
        Block::new_block(0, Vec::new(), BlockHash::SENTINEL, GENESIS_PROOF)
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_previous_hash(&self) -> &BlockHash {
        &self.previous_hash
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Digest of `(transactions, previous_hash, proof)`
    pub fn hash(&self) -> BlockHash {
        hasher::hash_content(&self.transactions, &self.previous_hash, self.proof)
    }

    pub(crate) fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_block() {
        let genesis = Block::generate_genesis_block();
        assert_eq!(genesis.get_index(), 0);
        assert!(genesis.get_transactions().is_empty());
        assert_eq!(genesis.get_previous_hash(), &BlockHash::SENTINEL);
        assert_eq!(genesis.get_proof(), GENESIS_PROOF);
        assert!(genesis.is_genesis());
    }

    #[test]
    fn test_hash_ignores_index() {
        let txs = vec![Transaction::new_reward("m", 1)];
        let a = Block::new_block(1, txs.clone(), BlockHash::SENTINEL, 3);
        let b = Block::new_block(2, txs, BlockHash::SENTINEL, 3);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_hash_tracks_transactions() {
        let mut block = Block::new_block(
            1,
            vec![Transaction::new("a", "b", 1)],
            BlockHash::SENTINEL,
            3,
        );
        let before = block.hash();
        block.replace_transactions(vec![Transaction::new("a", "b", 2)]);
        assert_ne!(before, block.hash());
    }

    #[test]
    fn test_json_rendering() {
        let block = Block::generate_genesis_block();
        let json = serde_json::to_value(&block).expect("block serializes");
        assert_eq!(json["index"], 0);
        assert_eq!(json["proof"], GENESIS_PROOF);
        assert_eq!(json["previous_hash"], "0".repeat(64));
    }
}
