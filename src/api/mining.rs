use actix_web::{post, web, HttpResponse, Responder};
use log::info;

use super::models::{AppState, MineRequest, MineResponse};
use crate::network::client;

/// Mine the pending pool into the next block and broadcast it.
///
/// PoW runs with the chain lock held: mining is a critical section and no
/// other chain mutation may interleave with it. The broadcast happens after
/// the lock is released and never blocks the response.
#[post("/mine")]
pub async fn mine(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let miner = req
        .into_inner()
        .miner_address
        .unwrap_or_else(|| state.node_id.clone());

    let block = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.mine_pending_transactions(&miner)
    };
    info!(
        "mined block {} for {} with {} transaction(s)",
        block.index,
        miner,
        block.transactions.len()
    );

    client::broadcast_block(&state, &block);

    HttpResponse::Ok().json(MineResponse {
        message: String::from("Block mined successfully"),
        block,
    })
}
