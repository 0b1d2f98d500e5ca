//! Example to run the HEXCHESS server standalone
//!
//! Run with: cargo run -p hexchess-server --example run_server

use hexchess_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig {
        seeded_game: Some("aaaaa-aaaaa-aaaaa-aaaaa-aaaaa".to_string()),
        ..ServerConfig::default()
    };

    println!("Starting HEXCHESS server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!(
        "Join the seeded game at ws://localhost:{}/api/game/aaaaa-aaaaa-aaaaa-aaaaa-aaaaa/ws?join_as=new",
        config.port
    );

    run_server(config).await
}
