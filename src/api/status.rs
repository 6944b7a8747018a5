use actix_web::{get, web, HttpResponse, Responder};

use super::models::{AppState, StatusResponse};
use crate::network::client;

/// Node health summary. `out_of_sync` probes every peer's chain length, so
/// the local snapshot is taken first and no lock is held during the probe.
#[get("/status")]
pub async fn get_status(state: web::Data<AppState>) -> impl Responder {
    let (chain_length, pending_transactions, last_block_hash) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (
            bc.len(),
            bc.pending_transactions.len(),
            bc.latest_block().hash.clone(),
        )
    };

    let out_of_sync = client::any_peer_ahead(&state).await;

    HttpResponse::Ok().json(StatusResponse {
        node_id: state.node_id.clone(),
        port: state.port,
        chain_length,
        peers: state.peers.snapshot(),
        pending_transactions,
        last_block_hash,
        out_of_sync,
    })
}
