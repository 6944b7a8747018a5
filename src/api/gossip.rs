use actix_web::{post, web, HttpResponse, Responder};
use log::info;

use super::models::{AppState, ErrorResponse, MessageResponse};
use crate::blockchain::Block;
use crate::transaction::Transaction;

/// Inbound gossip from a peer that just mined. The block must fill exactly
/// the next slot, link to our tip, and rehash bit-exact; anything else is
/// dropped with a 400. Forks and gaps are resolved by consensus, not here.
#[post("/receive_block")]
pub async fn receive_block(state: web::Data<AppState>, body: web::Json<Block>) -> impl Responder {
    let block = body.into_inner();
    let index = block.index;

    let result = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.try_accept_block(block)
    };

    match result {
        Ok(()) => {
            info!("accepted gossiped block {index}");
            HttpResponse::Ok().json(MessageResponse::new("Block accepted"))
        }
        Err(err) => HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
        }),
    }
}

/// Inbound gossip of a transaction accepted elsewhere. Runs the same local
/// gate and is never relayed onward; the response is always 200 with the
/// gate's verdict as the message.
#[post("/receive_transaction")]
pub async fn receive_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> impl Responder {
    let tx = body.into_inner();

    let gate = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.add_transaction(tx)
    };

    let message = match gate {
        Ok(()) => String::from("Transaction added successfully"),
        Err(err) => err.to_string(),
    };
    HttpResponse::Ok().json(MessageResponse::new(message))
}
