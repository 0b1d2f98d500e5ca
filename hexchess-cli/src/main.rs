//! HEXCHESS CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the game server
//! - replay: Print the score sheet of a stored game

mod replay;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexchess")]
#[command(about = "Glinsky hexagonal chess server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game server
    Serve(server::ServerArgs),
    /// Replay a stored game and print its moves
    Replay(replay::ReplayArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Replay(args) => replay::run(args),
    }
}
