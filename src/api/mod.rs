mod balance;
mod chain;
mod gossip;
mod mining;
pub mod models;
mod peers;
mod status;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

/// Register the node's full HTTP surface at the root scope. These paths are
/// the wire contract peers depend on, so they carry no version prefix.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(chain::get_blockchain)
        .service(chain::sync)
        .service(chain::consensus)
        .service(mining::mine)
        .service(tx::submit_transaction)
        .service(balance::get_balance)
        .service(peers::get_peers)
        .service(peers::register_peer)
        .service(gossip::receive_block)
        .service(gossip::receive_transaction)
        .service(status::get_status);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};

    use super::{init_routes, AppState};
    use crate::blockchain::Blockchain;

    macro_rules! node {
        ($state:ident, $app:ident) => {
            let $state = web::Data::new(AppState::new(5000));
            let $app = test::init_service(
                App::new().app_data($state.clone()).configure(init_routes),
            )
            .await;
        };
    }

    #[actix_web::test]
    async fn serves_the_genesis_chain() {
        node!(state, app);

        let req = test::TestRequest::get().uri("/blockchain").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["chain"].as_array().unwrap().len(), 1);
        assert_eq!(body["chain"][0]["index"], 0);
        assert_eq!(body["chain"][0]["previous_hash"], "0");
        assert_eq!(body["chain"][0]["transactions"], json!([]));
        assert_eq!(body["difficulty"], 2);
        assert_eq!(body["mining_reward"], 10.0);
        assert_eq!(state.blockchain.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn mining_and_transfers_move_balances() {
        node!(state, app);

        let req = test::TestRequest::post()
            .uri("/mine")
            .set_json(json!({ "miner_address": "alice" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Block mined successfully");
        assert_eq!(body["block"]["index"], 1);
        assert!(body["block"]["hash"].as_str().unwrap().starts_with("00"));

        let req = test::TestRequest::get().uri("/balance/alice").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["balance"], 10.0);

        let req = test::TestRequest::post()
            .uri("/transaction")
            .set_json(json!({ "sender": "alice", "receiver": "bob", "amount": 3.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/mine")
            .set_json(json!({ "miner_address": "alice" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/balance/alice").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["balance"], 17.0);

        let req = test::TestRequest::get().uri("/balance/bob").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["balance"], 3.0);

        assert_eq!(state.blockchain.lock().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn overdraft_is_a_client_error() {
        node!(state, app);

        let req = test::TestRequest::post()
            .uri("/mine")
            .set_json(json!({ "miner_address": "alice" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/transaction")
            .set_json(json!({ "sender": "alice", "receiver": "bob", "amount": 11.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Insufficient balance");

        assert!(state
            .blockchain
            .lock()
            .unwrap()
            .pending_transactions
            .is_empty());
    }

    #[actix_web::test]
    async fn mine_defaults_the_miner_to_the_node_id() {
        node!(state, app);

        let req = test::TestRequest::post()
            .uri("/mine")
            .set_json(json!({}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/balance/node_5000").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["balance"], 10.0);
        assert_eq!(state.blockchain.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn peer_registration_requires_a_url() {
        node!(state, app);

        let req = test::TestRequest::post()
            .uri("/register_peer")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid peer URL");

        let req = test::TestRequest::post()
            .uri("/register_peer")
            .set_json(json!({ "peer_url": "http://localhost:5001" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/peers").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["http://localhost:5001"]));
        assert_eq!(state.peers.snapshot(), vec!["http://localhost:5001"]);
    }

    #[actix_web::test]
    async fn gossiped_blocks_are_checked_against_the_tip() {
        node!(state, app);

        // A peer with the same genesis mines the next block.
        let mut remote = Blockchain::default();
        remote.chain = state.blockchain.lock().unwrap().chain.clone();
        let block = remote.mine_pending_transactions("bob");

        let req = test::TestRequest::post()
            .uri("/receive_block")
            .set_json(&block)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.blockchain.lock().unwrap().len(), 2);

        // The same index again is a duplicate and must be dropped.
        let req = test::TestRequest::post()
            .uri("/receive_block")
            .set_json(&block)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Block rejected");
        assert_eq!(state.blockchain.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn gossiped_transactions_run_the_local_gate() {
        node!(state, app);

        // Invalid on arrival still answers 200; the message carries the verdict.
        let req = test::TestRequest::post()
            .uri("/receive_transaction")
            .set_json(json!({
                "sender": "alice",
                "receiver": "alice",
                "amount": 1.0,
                "timestamp": 1_700_000_000.0
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Invalid transaction");
        assert!(state
            .blockchain
            .lock()
            .unwrap()
            .pending_transactions
            .is_empty());
    }

    #[actix_web::test]
    async fn sync_with_no_peers_reports_success() {
        node!(state, app);

        let req = test::TestRequest::get().uri("/sync").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Blockchain synced");
        assert_eq!(state.blockchain.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn consensus_with_no_longer_chain_keeps_ours() {
        node!(state, app);

        let req = test::TestRequest::get().uri("/consensus").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Blockchain is authoritative");
        assert_eq!(state.blockchain.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn status_reports_the_local_snapshot() {
        node!(state, app);

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["node_id"], "node_5000");
        assert_eq!(body["port"], 5000);
        assert_eq!(body["chain_length"], 1);
        assert_eq!(body["pending_transactions"], 0);
        assert_eq!(body["out_of_sync"], false);
        let tip = state.blockchain.lock().unwrap().latest_block().hash.clone();
        assert_eq!(body["last_block_hash"], tip);
    }
}
