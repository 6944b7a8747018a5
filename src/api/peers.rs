use actix_web::{get, post, web, HttpResponse, Responder};
use log::info;

use super::models::{AppState, ErrorResponse, MessageResponse, RegisterPeerRequest};
use crate::error::Error;

#[get("/peers")]
pub async fn get_peers(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.peers.snapshot())
}

/// One-directional registration: record the caller's URL. Callers wanting a
/// bidirectional link register themselves here and add us on their side.
#[post("/register_peer")]
pub async fn register_peer(
    state: web::Data<AppState>,
    body: web::Json<RegisterPeerRequest>,
) -> impl Responder {
    match body.into_inner().peer_url {
        Some(url) if !url.is_empty() => {
            if state.peers.add(url.clone()) {
                info!("registered peer {url}");
            }
            HttpResponse::Ok().json(MessageResponse::new("Peer registered successfully"))
        }
        _ => HttpResponse::BadRequest().json(ErrorResponse {
            error: Error::InvalidPeerUrl.to_string(),
        }),
    }
}
