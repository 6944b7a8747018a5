use actix_web::{post, web, HttpResponse, Responder};
use log::{debug, warn};

use super::models::{AppState, ErrorResponse, MessageResponse, NewTransactionRequest};
use crate::network::client;
use crate::transaction::Transaction;

/// Submit a new transaction. It is gated into the pending pool and, on
/// success, gossiped to every peer; broadcast responsibility lies with this
/// originating node only.
#[post("/transaction")]
pub async fn submit_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> impl Responder {
    let req = body.into_inner();
    let tx = Transaction::new(req.sender, req.receiver, req.amount);

    let gate = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.add_transaction(tx.clone())
    };

    match gate {
        Ok(()) => {
            debug!(
                "accepted transaction {} -> {} ({})",
                tx.sender, tx.receiver, tx.amount
            );
            client::broadcast_transaction(&state, &tx);
            HttpResponse::Ok().json(MessageResponse::new("Transaction added successfully"))
        }
        Err(err) => {
            warn!(
                "rejected transaction {} -> {} ({}): {err}",
                tx.sender, tx.receiver, tx.amount
            );
            HttpResponse::BadRequest().json(ErrorResponse {
                error: err.to_string(),
            })
        }
    }
}
