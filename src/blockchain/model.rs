use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Block, DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD};
use crate::error::{Error, Result};
use crate::transaction::Transaction;

/// The ledger state of one node: the chain itself, the pool of transactions
/// awaiting mining, and the balance table derived from the chain.
///
/// Serializes to the wire shape `{chain, difficulty, pending_transactions,
/// mining_reward}`; balances are derived state and must be rebuilt with
/// `update_balances` after deserialization or any chain change.
#[derive(Debug, Serialize, Deserialize)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub difficulty: u32,
    pub pending_transactions: Vec<Transaction>,
    pub mining_reward: f64,
    #[serde(skip)]
    pub balances: HashMap<String, f64>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl Blockchain {
    /// Initialize a new blockchain holding only the genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            difficulty,
            pending_transactions: Vec::new(),
            mining_reward: DEFAULT_MINING_REWARD,
            balances: HashMap::new(),
        }
    }

    /// The last block in the chain.
    pub fn latest_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Gate a transaction into the pending pool.
    ///
    /// Coinbase senders skip the solvency check; everyone else must cover
    /// the amount from their confirmed balance. Pending spends are not
    /// counted, so a sender can queue more than they hold until the next
    /// mine settles the pool.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<()> {
        if !transaction.is_valid() {
            return Err(Error::InvalidTransaction);
        }
        if !transaction.is_coinbase() && self.get_balance(&transaction.sender) < transaction.amount
        {
            return Err(Error::InsufficientBalance);
        }
        self.pending_transactions.push(transaction);
        Ok(())
    }

    /// Pack the pending pool (plus the miner's coinbase) into the next
    /// block, solve its PoW, and append it. Balances are rebuilt and the
    /// pool is cleared; the new block is returned for broadcast.
    pub fn mine_pending_transactions(&mut self, miner_address: &str) -> Block {
        self.pending_transactions
            .push(Transaction::coinbase(miner_address, self.mining_reward));

        let mut block = Block::new(
            self.chain.len() as u64,
            std::mem::take(&mut self.pending_transactions),
            self.latest_block().hash.clone(),
        );
        block.mine(self.difficulty);

        self.chain.push(block);
        self.update_balances();

        self.latest_block().clone()
    }

    /// Rebuild the balance table by replaying the whole chain in order.
    /// Coinbase debits are skipped; receivers are always credited.
    pub fn update_balances(&mut self) {
        self.balances.clear();
        for block in &self.chain {
            for tx in &block.transactions {
                if !tx.is_coinbase() {
                    *self.balances.entry(tx.sender.clone()).or_insert(0.0) -= tx.amount;
                }
                *self.balances.entry(tx.receiver.clone()).or_insert(0.0) += tx.amount;
            }
        }
    }

    /// Confirmed balance of an address; unknown addresses hold 0.
    pub fn get_balance(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    /// Validate linkage and hash integrity from block 1 onward. PoW is
    /// trusted if the hash reproduces.
    pub fn is_chain_valid(&self) -> bool {
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let previous = &self.chain[i - 1];

            if current.hash != current.compute_hash() {
                return false;
            }
            if current.previous_hash != previous.hash {
                return false;
            }
        }
        true
    }

    /// Accept a peer-mined block iff it fills exactly the next slot, links
    /// to our tip, and rehashes bit-exact. The pending pool is left as-is,
    /// so transactions the peer already mined stay queued locally.
    pub fn try_accept_block(&mut self, block: Block) -> Result<()> {
        if block.index != self.chain.len() as u64 {
            debug!(
                "rejecting block {}: expected index {}",
                block.index,
                self.chain.len()
            );
            return Err(Error::BlockRejected);
        }
        if block.previous_hash != self.latest_block().hash {
            debug!("rejecting block {}: previous hash does not match tip", block.index);
            return Err(Error::BlockRejected);
        }
        if block.hash != block.compute_hash() {
            warn!("rejecting block {}: hash does not reproduce", block.index);
            return Err(Error::BlockRejected);
        }

        self.chain.push(block);
        self.update_balances();
        Ok(())
    }

    /// Adopt a peer's chain wholesale if it is strictly longer than ours and
    /// internally valid. Returns whether the local chain was replaced.
    pub fn try_adopt(&mut self, peer: Blockchain) -> bool {
        if peer.len() <= self.len() || !peer.is_chain_valid() {
            return false;
        }
        info!("replacing local chain (len {}) with peer chain (len {})", self.len(), peer.len());
        self.chain = peer.chain;
        self.update_balances();
        true
    }
}
