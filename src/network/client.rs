//! Outbound peer traffic: gossip fan-out, chain fetches, registration, and
//! the longest-chain election. Every call is bounded by a timeout and every
//! failure is logged and dropped; peers being unreachable never surfaces to
//! the client that triggered the operation.

use std::time::Duration;

use actix_web::web;
use log::{info, warn};

use crate::api::models::AppState;
use crate::blockchain::{Block, Blockchain};
use crate::transaction::Transaction;

/// Per-peer budget for fire-and-forget sends and the status probe.
const GOSSIP_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for whole-chain fetches during sync and consensus.
const SYNC_TIMEOUT: Duration = Duration::from_secs(10);

/// Send a freshly mined block to every known peer, one concurrent task per
/// peer. Returns immediately; delivery is best-effort and convergence is
/// left to the consensus step.
pub fn broadcast_block(state: &web::Data<AppState>, block: &Block) {
    for peer in state.peers.snapshot() {
        let http = state.http.clone();
        let block = block.clone();
        actix_web::rt::spawn(async move {
            let url = format!("{peer}/receive_block");
            match http
                .post(&url)
                .timeout(GOSSIP_TIMEOUT)
                .json(&block)
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!(
                    "peer {peer} rejected block {} ({})",
                    block.index,
                    resp.status()
                ),
                Err(err) => warn!("failed to broadcast block to {peer}: {err}"),
            }
        });
    }
}

/// Send an accepted transaction to every known peer. Receivers run their own
/// gate and do not relay further.
pub fn broadcast_transaction(state: &web::Data<AppState>, transaction: &Transaction) {
    for peer in state.peers.snapshot() {
        let http = state.http.clone();
        let transaction = transaction.clone();
        actix_web::rt::spawn(async move {
            let url = format!("{peer}/receive_transaction");
            if let Err(err) = http
                .post(&url)
                .timeout(GOSSIP_TIMEOUT)
                .json(&transaction)
                .send()
                .await
            {
                warn!("failed to broadcast transaction to {peer}: {err}");
            }
        });
    }
}

/// Fetch and deserialize a peer's full chain, rebuilding its derived
/// balances. None on timeout, non-2xx, or a malformed payload.
async fn fetch_chain(
    http: &reqwest::Client,
    peer: &str,
    timeout: Duration,
) -> Option<Blockchain> {
    let url = format!("{peer}/blockchain");
    let resp = match http.get(&url).timeout(timeout).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            warn!("peer {peer} answered /blockchain with {}", resp.status());
            return None;
        }
        Err(err) => {
            warn!("failed to fetch chain from {peer}: {err}");
            return None;
        }
    };
    match resp.json::<Blockchain>().await {
        Ok(mut remote) => {
            remote.update_balances();
            Some(remote)
        }
        Err(err) => {
            warn!("malformed chain payload from {peer}: {err}");
            None
        }
    }
}

/// One sync pass: walk the peer set and adopt any strictly longer valid
/// chain as soon as it is seen. Later peers may replace earlier adoptions;
/// the end state is still the longest chain observed.
pub async fn sync_with_peers(state: &web::Data<AppState>) {
    for peer in state.peers.snapshot() {
        if let Some(remote) = fetch_chain(&state.http, &peer, SYNC_TIMEOUT).await {
            let mut bc = state.blockchain.lock().expect("mutex poisoned");
            if bc.try_adopt(remote) {
                info!("blockchain updated from peer {peer}");
            }
        }
    }
}

/// Longest-valid-chain election across all peers, ties broken by first
/// seen. Returns whether the local chain was replaced.
pub async fn resolve_conflicts(state: &web::Data<AppState>) -> bool {
    let mut max_length = state.blockchain.lock().expect("mutex poisoned").len();
    let mut longest: Option<Blockchain> = None;

    for peer in state.peers.snapshot() {
        let Some(remote) = fetch_chain(&state.http, &peer, SYNC_TIMEOUT).await else {
            continue;
        };
        if remote.len() > max_length && remote.is_chain_valid() {
            max_length = remote.len();
            longest = Some(remote);
        }
    }

    match longest {
        // The local chain may have grown while the election ran with no
        // lock held; try_adopt re-checks strict length at install time.
        Some(winner) => state.blockchain.lock().expect("mutex poisoned").try_adopt(winner),
        None => false,
    }
}

/// Post this node's address to a remote `/register_peer` so the
/// relationship becomes bidirectional; on success the peer is recorded
/// locally as well.
pub async fn register_with_peer(state: &web::Data<AppState>, peer_url: &str) -> bool {
    let url = format!("{peer_url}/register_peer");
    let body = serde_json::json!({ "peer_url": state.address });
    match state
        .http
        .post(&url)
        .timeout(GOSSIP_TIMEOUT)
        .json(&body)
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            state.peers.add(peer_url.to_string());
            info!("registered with peer {peer_url}");
            true
        }
        Ok(resp) => {
            warn!("peer {peer_url} refused registration ({})", resp.status());
            false
        }
        Err(err) => {
            warn!("failed to register with peer {peer_url}: {err}");
            false
        }
    }
}

/// True iff some peer currently reports a strictly longer chain than ours.
/// Unreachable peers are skipped.
pub async fn any_peer_ahead(state: &web::Data<AppState>) -> bool {
    let local_len = state.blockchain.lock().expect("mutex poisoned").len();
    for peer in state.peers.snapshot() {
        if let Some(remote) = fetch_chain(&state.http, &peer, GOSSIP_TIMEOUT).await {
            if remote.len() > local_len {
                return true;
            }
        }
    }
    false
}
