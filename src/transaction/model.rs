use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::SYSTEM_SENDER;

/// A single transfer of value between two addresses. Immutable once created:
/// it moves from the pending pool into a block without modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    /// Fractional seconds since the Unix epoch.
    pub timestamp: f64,
}

/// Current wall-clock time as fractional epoch seconds.
pub fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1e6
}

impl Transaction {
    /// Build a transaction timestamped now. Wire-received transactions keep
    /// their original timestamp via plain deserialization instead.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp: now_timestamp(),
        }
    }

    /// Coinbase reward paid to a miner.
    pub fn coinbase(miner_address: &str, amount: f64) -> Self {
        Self::new(SYSTEM_SENDER, miner_address, amount)
    }

    pub fn is_coinbase(&self) -> bool {
        self.sender == SYSTEM_SENDER
    }

    /// Field-level validity: positive amount, distinct non-empty endpoints.
    /// Solvency is checked separately by the chain, which exempts coinbases.
    pub fn is_valid(&self) -> bool {
        self.amount > 0.0
            && self.sender != self.receiver
            && !self.sender.is_empty()
            && !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transfer() {
        let tx = Transaction::new("alice", "bob", 3.5);
        assert!(tx.is_valid());
        assert!(tx.timestamp > 0.0);
        assert!(!tx.is_coinbase());
    }

    #[test]
    fn coinbase_is_valid_and_tagged() {
        let tx = Transaction::coinbase("miner-1", 10.0);
        assert!(tx.is_valid());
        assert!(tx.is_coinbase());
        assert_eq!(tx.sender, SYSTEM_SENDER);
    }

    #[test]
    fn zero_and_negative_amounts_rejected() {
        assert!(!Transaction::new("alice", "bob", 0.0).is_valid());
        assert!(!Transaction::new("alice", "bob", -1.0).is_valid());
    }

    #[test]
    fn self_send_rejected() {
        assert!(!Transaction::new("alice", "alice", 1.0).is_valid());
    }

    #[test]
    fn empty_endpoints_rejected() {
        assert!(!Transaction::new("", "bob", 1.0).is_valid());
        assert!(!Transaction::new("alice", "", 1.0).is_valid());
    }
}
