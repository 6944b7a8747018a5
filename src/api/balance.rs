use actix_web::{get, web, HttpResponse, Responder};

use super::models::{AppState, BalanceResponse};

/// Confirmed balance of an address, from the replay-derived table. Pending
/// transactions are not reflected.
#[get("/balance/{address}")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let address = path.into_inner();
    let balance = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        bc.get_balance(&address)
    };
    HttpResponse::Ok().json(BalanceResponse { address, balance })
}
