use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Blockchain};
use crate::network::PeerSet;

/// Shared per-node state: the mutex-guarded ledger, the peer set, and the
/// node's own identity. One instance lives behind `web::Data` for the whole
/// process.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub peers: PeerSet,
    pub http: reqwest::Client,
    pub node_id: String,
    pub port: u16,
    /// The address this node advertises when registering with peers.
    pub address: String,
}

impl AppState {
    pub fn new(port: u16) -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::default()),
            peers: PeerSet::default(),
            http: reqwest::Client::new(),
            node_id: format!("node_{port}"),
            port,
            address: format!("http://localhost:{port}"),
        }
    }
}

/* ---------- Request/Response Models ---------- */

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Deserialize)]
pub struct MineRequest {
    /// Defaults to this node's id when absent.
    #[serde(default)]
    pub miner_address: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub block: Block,
}

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
}

#[derive(Deserialize)]
pub struct RegisterPeerRequest {
    #[serde(default)]
    pub peer_url: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub node_id: String,
    pub port: u16,
    pub chain_length: usize,
    pub peers: Vec<String>,
    pub pending_transactions: usize,
    pub last_block_hash: String,
    pub out_of_sync: bool,
}
