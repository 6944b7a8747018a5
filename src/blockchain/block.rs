use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::{model::now_timestamp, Transaction};

/// A single block in the chain holding an ordered list of transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
    /// Fractional seconds since the Unix epoch.
    pub timestamp: f64,
    pub nonce: u64,
    /// Cached hash of the block, refreshed while mining.
    pub hash: String,
}

impl Block {
    /// Genesis block: index 0, no transactions, previous hash "0". Its hash
    /// is computed once and accepted as-is, never mined.
    pub fn genesis() -> Self {
        Self::new(0, Vec::new(), String::from("0"))
    }

    /// Create a new block (not mined yet). Call `mine()` to perform PoW.
    pub fn new(index: u64, transactions: Vec<Transaction>, previous_hash: String) -> Self {
        let mut block = Self {
            index,
            transactions,
            previous_hash,
            timestamp: now_timestamp(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// SHA-256 of the block's canonical serialization, in lowercase hex.
    ///
    /// The preimage is the compact JSON of `{index, nonce, previous_hash,
    /// timestamp, transactions}` with object keys in lexicographic order
    /// (serde_json maps are BTree-backed, so nested transaction objects sort
    /// the same way). Peers recompute this byte sequence to validate, so it
    /// is the cross-node identity of the block; the cached `hash` field is
    /// excluded.
    pub fn compute_hash(&self) -> String {
        let preimage = serde_json::json!({
            "index": self.index,
            "nonce": self.nonce,
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
        });
        let mut hasher = Sha256::new();
        hasher.update(preimage.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Brute-force the smallest nonce whose hash carries `difficulty`
    /// leading zeros. Runs to completion; there is no cancellation.
    pub fn mine(&mut self, difficulty: u32) {
        let started = Instant::now();
        loop {
            self.hash = self.compute_hash();
            if self.meets_difficulty(difficulty) {
                break;
            }
            self.nonce += 1;
            if self.nonce % 10_000 == 0 {
                debug!("mining block {}: nonce {}", self.index, self.nonce);
            }
        }
        info!(
            "block {} mined in {:.2}s with nonce {}",
            self.index,
            started.elapsed().as_secs_f64(),
            self.nonce
        );
    }

    /// Whether the cached hash satisfies the PoW target.
    pub fn meets_difficulty(&self, difficulty: u32) -> bool {
        self.hash
            .chars()
            .take(difficulty as usize)
            .all(|c| c == '0')
    }
}
