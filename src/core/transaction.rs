// This file defines the account-style transfer that moves value in my ledger
// There are no inputs/outputs here: balances are folded from the committed history

use serde::Serialize;
use std::fmt;

/// Transfer amount in whole units
pub type Amount = u64;

/// Derived balance; signed because a tampered history can drive it below zero
pub type Balance = i128;

/// Sender used for mining rewards. Ordinary transfers may not name it on either side,
/// and it is only exempt from the debit when it closes a mined block.
pub const REWARD_SENDER: &str = "MINING";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    sender: String,    // Who pays
    recipient: String, // Who gets paid
    amount: Amount,    // How much
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, amount: Amount) -> Transaction {
        Transaction {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        }
    }

    // When a block is mined I pay the miner with one of these as the block's last transaction
    pub fn new_reward(miner: &str, amount: Amount) -> Transaction {
        Transaction::new(REWARD_SENDER, miner, amount)
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> Amount {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }

    /// True if either side is the reward sentinel
    pub fn touches_reward_sender(&self) -> bool {
        self.sender == REWARD_SENDER || self.recipient == REWARD_SENDER
    }

    /// Signed effect of this transaction on `participant`'s balance.
    ///
    /// `minted` marks the reward that closes a mined block: its sender is not
    /// debited. Every other transaction is a plain transfer, whoever sends it.
    pub fn balance_delta(&self, participant: &str, minted: bool) -> Balance {
        let amount = Balance::from(self.amount);
        let mut delta = 0;
        if self.recipient == participant {
            delta += amount;
        }
        if self.sender == participant && !minted {
            delta -= amount;
        }
        delta
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.sender, self.recipient, self.amount)
    }
}
