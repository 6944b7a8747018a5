use actix_web::{get, web, HttpResponse, Responder};

use super::models::{AppState, MessageResponse};
use crate::network::client;

/// Full chain object; the same payload peers deserialize during sync and
/// consensus.
#[get("/blockchain")]
pub async fn get_blockchain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(&*bc)
}

/// Pull-based sync: adopt any strictly longer valid peer chain.
#[get("/sync")]
pub async fn sync(state: web::Data<AppState>) -> impl Responder {
    client::sync_with_peers(&state).await;
    HttpResponse::Ok().json(MessageResponse::new("Blockchain synced"))
}

/// Longest-valid-chain election; the node's convergence primitive after a
/// partition.
#[get("/consensus")]
pub async fn consensus(state: web::Data<AppState>) -> impl Responder {
    let replaced = client::resolve_conflicts(&state).await;
    let message = if replaced {
        "Blockchain was replaced"
    } else {
        "Blockchain is authoritative"
    };
    HttpResponse::Ok().json(MessageResponse::new(message))
}
