mod api;
mod blockchain;
mod error;
mod network;
mod transaction;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use dotenvy::dotenv;
use std::env;

use api::AppState;
use network::client;

/// Run a peer-to-peer blockchain node.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Peer URLs to register with and sync from at startup.
    #[arg(long, num_args = 0..)]
    peers: Vec<String>,
    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _ = dotenv();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "info" }),
    )
    .init();

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let state = web::Data::new(AppState::new(args.port));

    // Join the network before serving: announce ourselves to each peer, then
    // pull the longest chain they hold. A fresh node starts from genesis
    // otherwise.
    for peer in &args.peers {
        client::register_with_peer(&state, peer).await;
    }
    if !args.peers.is_empty() {
        client::sync_with_peers(&state).await;
    }

    log::info!(
        "starting blockchain node {} at http://{host}:{}",
        state.node_id,
        args.port
    );

    let data = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), args.port))?
    .run()
    .await
}
