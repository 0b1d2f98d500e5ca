//! Replay command - rebuild a stored game and print its moves
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_game(), report()
//! - Level 3: format_score_sheet(), format_result()

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use hexchess_core::{Color, Game, JsonFileStore, Move, Outcome};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Directory where game records are kept
    #[arg(long, default_value = "games")]
    pub data_dir: PathBuf,

    /// Id of the game to replay
    #[arg(long)]
    pub id: String,

    /// Print the final game state as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: ReplayArgs) -> Result<()> {
    let game = load_game(&args)?;
    report(&game, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_game(args: &ReplayArgs) -> Result<Game> {
    let store = Arc::new(JsonFileStore::new(&args.data_dir));
    Game::load(&args.id, store)
        .with_context(|| format!("Failed to replay game {} from {}", args.id, args.data_dir.display()))
}

fn report(game: &Game, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&game.state())?);
        return Ok(());
    }

    println!("Game {}", game.id());
    print!("{}", format_score_sheet(game.moves()));
    println!("{}", format_result(game));
    Ok(())
}

// ============================================================================
// LEVEL 3 - FORMATTING
// ============================================================================

/// Numbered move pairs, one line per full move
fn format_score_sheet(moves: &[Move]) -> String {
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let notations: Vec<&str> = pair.iter().map(|m| m.notation.as_str()).collect();
            format!("{:>3}. {}\n", i + 1, notations.join(" "))
        })
        .collect()
}

fn format_result(game: &Game) -> String {
    let winner = |color: Option<Color>| color.map_or("nobody", Color::as_str);

    match game.outcome() {
        Outcome::None => format!("In progress, {} to move", game.current_turn().as_str()),
        Outcome::Checkmate => format!("Checkmate, {} wins", winner(game.winner())),
        Outcome::Stalemate => format!("Stalemate, {} wins", winner(game.winner())),
        Outcome::Forfeit => format!("Forfeit, {} wins", winner(game.winner())),
    }
}

// ============================================================================
// TESTS
// ============================================================================
