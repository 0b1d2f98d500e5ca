//! Integration tests for the hexchess binary
//!
//! Tests the full stack: a game is played and persisted through the core
//! crate, then replayed by the CLI from its JSON record.

use hexchess_core::{Board, Color, Game, GameStore, JsonFileStore, MoveRequest};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hexchess-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn replay(dir: &PathBuf, id: &str, json: bool) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hexchess"));
    cmd.arg("replay")
        .arg("--data-dir")
        .arg(dir)
        .arg("--id")
        .arg(id);
    if json {
        cmd.arg("--json");
    }
    cmd.output().expect("failed to run hexchess")
}

// ============================================================================
// REPLAY
// ============================================================================

#[test]
fn test_replay_prints_score_sheet() {
    let dir = data_dir("sheet");
    let store = Arc::new(JsonFileStore::new(&dir));

    let mut game = Game::with_id("cli-game").with_store(store);
    game.do_move(Color::White, "k1", "k2", None).unwrap();
    game.do_move(Color::Black, "f7", "f6", None).unwrap();
    game.do_move(Color::White, "e4", "e6", None).unwrap();
    game.do_move(Color::Black, "f6", "e5", None).unwrap();

    let output = replay(&dir, "cli-game", false);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Game cli-game"));
    assert!(stdout.contains("  1. k2 f6"));
    assert!(stdout.contains("  2. e6 xe5"));
    assert!(stdout.contains("In progress, white to move"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_replay_json_state() {
    let dir = data_dir("json");
    let store = Arc::new(JsonFileStore::new(&dir));

    let mut game = Game::with_id("json-game").with_store(store);
    game.do_move(Color::White, "f5", "f6", None).unwrap();
    game.forfeit(Color::Black).unwrap();

    let output = replay(&dir, "json-game", true);
    assert!(output.status.success());

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["id"], "json-game");
    assert_eq!(state["finished"], true);
    assert_eq!(state["outcome"], "forfeit");
    assert_eq!(state["winner"], "white");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_replay_missing_game_fails() {
    let dir = data_dir("missing");

    let output = replay(&dir, "ghost", false);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn test_replay_rejects_corrupt_history() {
    let dir = data_dir("corrupt");
    let store = JsonFileStore::new(&dir);

    // The second ply moves a white pawn on Black's turn
    let mut record = Game::with_board("bad-game", Board::new()).record();
    record.moves = vec![
        MoveRequest {
            from: "e4".to_string(),
            to: "e6".to_string(),
            promotion_piece: None,
        },
        MoveRequest {
            from: "e6".to_string(),
            to: "e8".to_string(),
            promotion_piece: None,
        },
    ];
    store.save(&record).unwrap();

    let output = replay(&dir, "bad-game", false);
    assert!(!output.status.success());

    let _ = std::fs::remove_dir_all(&dir);
}
