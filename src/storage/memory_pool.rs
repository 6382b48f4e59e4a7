use crate::core::{Amount, Balance, Blockchain, Transaction, REWARD_SENDER};
use crate::error::TxError;

/// Pending transactions, kept in submission order
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    inner: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> TransactionPool {
        TransactionPool { inner: Vec::new() }
    }

    /// Sum of amounts `sender` has already committed to pending transactions
    pub fn reserved_by(&self, sender: &str) -> Balance {
        self.inner
            .iter()
            .filter(|tx| tx.get_sender() == sender)
            .map(|tx| Balance::from(tx.get_amount()))
            .sum()
    }

    /// What `sender` may still spend: chain balance minus pending spends
    pub fn available_balance(&self, chain: &Blockchain, sender: &str) -> Balance {
        chain.balance_of(sender) - self.reserved_by(sender)
    }

    /// Admit a transfer if the sender can cover it.
    ///
    /// On error the pool is left exactly as it was.
    pub fn submit(
        &mut self,
        chain: &Blockchain,
        sender: &str,
        recipient: &str,
        amount: Amount,
    ) -> Result<(), TxError> {
        if amount == 0 {
            return Err(TxError::InvalidAmount);
        }

        let tx = Transaction::new(sender, recipient, amount);
        if tx.touches_reward_sender() {
            return Err(TxError::ReservedParticipant(REWARD_SENDER.to_string()));
        }

        let available = self.available_balance(chain, sender);
        if Balance::from(amount) > available {
            return Err(TxError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.inner.push(tx);
        Ok(())
    }

    /// Re-check every pending transaction in order against the chain,
    /// counting only the spends that precede it
    pub fn verify_all(&self, chain: &Blockchain) -> bool {
        let mut checked = TransactionPool::new();
        self.inner.iter().all(|tx| {
            checked
                .submit(chain, tx.get_sender(), tx.get_recipient(), tx.get_amount())
                .is_ok()
        })
    }

    /// Remove and return every pending transaction
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.inner)
    }

    pub fn pending(&self) -> &[Transaction] {
        self.inner.as_slice()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
