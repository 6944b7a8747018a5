use std::collections::HashSet;
use std::sync::RwLock;

/// Addresses of known peer nodes. Membership is additive only; there is no
/// eviction. Broadcast and election loops iterate over a snapshot so the
/// lock is never held across network I/O.
#[derive(Debug, Default)]
pub struct PeerSet {
    inner: RwLock<HashSet<String>>,
}

impl PeerSet {
    /// Add a peer URL; returns false if it was already known.
    pub fn add(&self, url: String) -> bool {
        self.inner.write().expect("peer set poisoned").insert(url)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.inner
            .read()
            .expect("peer set poisoned")
            .iter()
            .cloned()
            .collect()
    }
}
