// This is the mining orchestrator and the surface the CLI talks to
// A Ledger owns one chain and one pool; every operation goes through an explicit instance

use crate::config::Config;
use crate::core::validator::{ChainValidator, IntegrityViolation};
use crate::core::{
    Amount, Balance, BalanceDetails, Block, Blockchain, MiningControl, ProofOfWork, Transaction,
    MAX_DIFFICULTY, REWARD_SENDER,
};
use crate::error::{Result, TxError};
use crate::storage::TransactionPool;
use log::{info, warn};
use std::collections::BTreeSet;

pub struct Ledger {
    chain: Blockchain,
    pool: TransactionPool,
    validator: ChainValidator,
    max_mining_attempts: Option<u64>,
}

impl Ledger {
    /// New ledger holding only genesis.
    ///
    /// A difficulty above [`MAX_DIFFICULTY`] could never be met, so it is
    /// clamped to the maximum.
    pub fn new(difficulty: u32) -> Ledger {
        if difficulty > MAX_DIFFICULTY {
            warn!("Difficulty {difficulty} exceeds maximum, using {MAX_DIFFICULTY}");
        }
        let difficulty = difficulty.min(MAX_DIFFICULTY);
        Ledger {
            chain: Blockchain::new_blockchain(difficulty),
            pool: TransactionPool::new(),
            validator: ChainValidator::new(difficulty),
            max_mining_attempts: None,
        }
    }

    pub fn from_config(config: &Config) -> Ledger {
        let mut ledger = Ledger::new(config.difficulty);
        ledger.max_mining_attempts = config.max_mining_attempts;
        ledger
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    pub fn difficulty(&self) -> u32 {
        self.chain.get_difficulty()
    }

    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Amount,
    ) -> std::result::Result<(), TxError> {
        self.pool.submit(&self.chain, sender, recipient, amount)
    }

    /// Mine every pending transaction plus a reward for `miner` into a new block.
    ///
    /// Runs until a proof is found unless the ledger was configured with an
    /// attempt bound.
    pub fn mine(&mut self, miner: &str, reward: Amount) -> Result<Block> {
        let control = MiningControl::new().with_max_attempts(self.max_mining_attempts);
        self.mine_with_control(miner, reward, &control)
    }

    // If the search is cancelled or runs out of attempts I return before
    // draining anything, so the pool and chain are exactly as they were
    pub fn mine_with_control(
        &mut self,
        miner: &str,
        reward: Amount,
        control: &MiningControl<'_>,
    ) -> Result<Block> {
        if miner == REWARD_SENDER {
            return Err(TxError::ReservedParticipant(REWARD_SENDER.to_string()).into());
        }

        let mut transactions = self.pool.pending().to_vec();
        transactions.push(Transaction::new_reward(miner, reward));

        let previous_hash = self.chain.last_block().hash();
        let index = self.chain.len();
        let difficulty = self.chain.get_difficulty();

        info!(
            "Mining block {index} with {} transactions (difficulty: {difficulty})",
            transactions.len()
        );
        let proof = ProofOfWork::new_proof_of_work(&previous_hash, &transactions, difficulty)
            .run_with(control)?;

        let block = Block::new_block(index, transactions, previous_hash, proof);
        self.chain.append(block.clone())?;

        // The snapshot above is the pool verbatim and nothing can be submitted
        // in between, so draining removes exactly what was sealed
        self.pool.drain();
        info!("Successfully mined block {index}: {} (proof: {proof})", block.hash());

        Ok(block)
    }

    pub fn validate_chain(&self) -> bool {
        self.validator.is_valid(self.chain.blocks())
    }

    pub fn validate_report(&self) -> std::result::Result<(), IntegrityViolation> {
        self.validator.validate(self.chain.blocks())
    }

    pub fn get_balance(&self, participant: &str) -> Balance {
        self.chain.balance_of(participant)
    }

    pub fn balance_details(&self, participant: &str) -> BalanceDetails {
        self.chain.balance_details(participant)
    }

    pub fn list_blocks(&self) -> &[Block] {
        self.chain.blocks()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pool.pending()
    }

    pub fn verify_pending_transactions(&self) -> bool {
        self.pool.verify_all(&self.chain)
    }

    /// Participants of the chain and of pending transactions
    pub fn participants(&self) -> BTreeSet<String> {
        let mut participants = self.chain.participants();
        for tx in self.pool.pending() {
            participants.insert(tx.get_sender().to_string());
            participants.insert(tx.get_recipient().to_string());
        }
        participants.remove(REWARD_SENDER);
        participants
    }

    /// Debug hook, see [`Blockchain::tamper`]
    pub fn tamper(&mut self, index: usize, transactions: Vec<Transaction>) -> Result<()> {
        self.chain.tamper(index, transactions)
    }
}
