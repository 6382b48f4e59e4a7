// This is the chain store - the single owner of every sealed block
// Blocks live in a flat Vec; each one points back with the digest of its predecessor
// Nothing here ever edits or removes a block once appended (the tamper hook aside)

use crate::core::{Balance, Block, ProofOfWork, Transaction, REWARD_SENDER};
use crate::error::{LedgerError, Result};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Received, sent, and net totals for one participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceDetails {
    pub received: Balance,
    pub sent: Balance,
    pub balance: Balance,
}

#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>, // Index i holds the block with index i
    difficulty: u32,    // Every non-genesis block must meet this
}

impl Blockchain {
    // When I want a brand new chain, I seed it with the fixed genesis block
    pub fn new_blockchain(difficulty: u32) -> Blockchain {
        info!("Creating genesis block (difficulty: {difficulty})");
        Blockchain {
            blocks: vec![Block::generate_genesis_block()],
            difficulty,
        }
    }

    pub fn get_difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    // The genesis block is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn last_block(&self) -> &Block {
        // blocks always holds at least the genesis block
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get(&self, index: usize) -> Result<&Block> {
        self.blocks
            .get(index)
            .ok_or(LedgerError::BlockNotFound(index))
    }

    pub fn blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    // Only the mining orchestrator calls this. I check the block actually
    // extends my tip before sealing it in.
    pub fn append(&mut self, block: Block) -> Result<()> {
        let expected_index = self.blocks.len();
        if block.get_index() != expected_index {
            return Err(LedgerError::InvalidBlock(format!(
                "Expected index {expected_index}, got {}",
                block.get_index()
            )));
        }

        if block.get_transactions().is_empty() {
            return Err(LedgerError::InvalidBlock(
                "Only the genesis block may be empty".to_string(),
            ));
        }

        let tip_hash = self.last_block().hash();
        if block.get_previous_hash() != &tip_hash {
            return Err(LedgerError::InvalidBlock(format!(
                "Previous hash {} does not match tip {tip_hash}",
                block.get_previous_hash()
            )));
        }

        if !ProofOfWork::validate(
            block.get_previous_hash(),
            block.get_transactions(),
            block.get_proof(),
            self.difficulty,
        ) {
            return Err(LedgerError::InvalidBlock(format!(
                "Proof {} does not satisfy difficulty {}",
                block.get_proof(),
                self.difficulty
            )));
        }

        debug!(
            "Appending block {} with {} transactions",
            block.get_index(),
            block.get_transactions().len()
        );
        self.blocks.push(block);
        Ok(())
    }

    // Every committed transaction paired with whether it is a minted reward.
    // Only the last transaction of a block may be one, and only if it carries
    // the reward sender; the name alone anywhere else is an ordinary transfer.
    fn committed_transactions(&self) -> impl Iterator<Item = (&Transaction, bool)> {
        self.blocks.iter().flat_map(|block| {
            let transactions = block.get_transactions();
            let last = transactions.len().saturating_sub(1);
            transactions
                .iter()
                .enumerate()
                .map(move |(i, tx)| (tx, i == last && tx.is_reward()))
        })
    }

    /// Net balance folded over every committed transaction
    pub fn balance_of(&self, participant: &str) -> Balance {
        self.committed_transactions()
            .map(|(tx, minted)| tx.balance_delta(participant, minted))
            .sum()
    }

    pub fn balance_details(&self, participant: &str) -> BalanceDetails {
        let mut details = BalanceDetails::default();
        for (tx, minted) in self.committed_transactions() {
            let amount = Balance::from(tx.get_amount());
            if tx.get_recipient() == participant {
                details.received += amount;
            }
            if tx.get_sender() == participant && !minted {
                details.sent += amount;
            }
        }
        details.balance = details.received - details.sent;
        details
    }

    /// Everyone who appears in a committed transaction, reward sender excluded
    pub fn participants(&self) -> BTreeSet<String> {
        let mut participants = BTreeSet::new();
        for (tx, _) in self.committed_transactions() {
            participants.insert(tx.get_sender().to_string());
            participants.insert(tx.get_recipient().to_string());
        }
        participants.remove(REWARD_SENDER);
        participants
    }

    /// Debug hook: overwrite a historical block's transactions in place.
    ///
    /// This deliberately breaks the append-only guarantee so the validator's
    /// failure paths can be exercised. Normal operation never calls it.
    pub fn tamper(&mut self, index: usize, transactions: Vec<Transaction>) -> Result<()> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(LedgerError::BlockNotFound(index))?;
        warn!("Block {index} manipulated in place");
        block.replace_transactions(transactions);
        Ok(())
    }
}
