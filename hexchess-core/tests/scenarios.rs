//! Integration tests for the HEXCHESS engine
//!
//! Plays whole games through the session API and checks board invariants
//! after every ply.

use hexchess_core::{
    Board, Color, Game, GameError, GameStore, JsonFileStore, Outcome, Piece,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Every (from, to) pair the side to move may play
fn legal_moves(game: &Game) -> Vec<(String, String)> {
    let color = game.current_turn();
    let board = game.board();
    board
        .graph()
        .ids()
        .filter(|&id| board.squares()[id].color() == Some(color))
        .flat_map(|id| {
            let from = board.graph().name(id).to_string();
            board
                .allowed_moves(&from)
                .unwrap()
                .into_iter()
                .map(move |to| (from.clone(), to))
        })
        .collect()
}

/// Play random legal moves until the game ends or `max_plies` is reached
fn random_playout(seed: u64, max_plies: usize, mut check: impl FnMut(&Game)) -> Game {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut game = Game::with_id(format!("playout-{seed}"));

    for _ in 0..max_plies {
        if game.is_finished() {
            break;
        }
        let moves = legal_moves(&game);
        let (from, to) = moves.choose(&mut rng).cloned().unwrap();
        let color = game.current_turn();
        game.do_move(color, &from, &to, Some("queen")).unwrap();
        check(&game);
    }

    game
}

// ============================================================================
// INVARIANTS
// ============================================================================

#[test]
fn test_allowed_moves_never_expose_own_king() {
    for seed in 0..3 {
        random_playout(seed, 40, |game| {
            let color = game.current_turn();
            for (from, to) in legal_moves(game) {
                let mut trial = game.board().clone();
                trial.do_move(&from, &to, Some("queen")).unwrap();
                assert!(
                    !trial.is_king_checked(color),
                    "{from}-{to} leaves {color:?} in check"
                );
            }
        });
    }
}

#[test]
fn test_mover_is_never_left_in_check() {
    for seed in 10..15 {
        random_playout(seed, 120, |game| {
            let mover = game.current_turn().opponent();
            assert!(!game.board().is_king_checked(mover));
        });
    }
}

#[test]
fn test_at_most_one_double_move_flag() {
    for seed in 20..25 {
        random_playout(seed, 80, |game| {
            let flagged = game.board().squares().iter().filter(|sq| sq.double_moved).count();
            assert!(flagged <= 1);
        });
    }
}

#[test]
fn test_serialize_round_trip_every_ply() {
    random_playout(7, 100, |game| {
        let rebuilt = Board::from_serialized(&game.board().serialize()).unwrap();
        assert_eq!(rebuilt.squares(), game.board().squares());
    });
}

#[test]
fn test_replay_reproduces_game() {
    for seed in 30..33 {
        let game = random_playout(seed, 150, |_| {});
        let restored = Game::restore(&game.record()).unwrap();

        assert_eq!(restored.board().squares(), game.board().squares());
        assert_eq!(restored.moves(), game.moves());
        assert_eq!(restored.current_turn(), game.current_turn());
        assert_eq!(restored.is_finished(), game.is_finished());
        assert_eq!(restored.outcome(), game.outcome());
    }
}

#[test]
fn test_finished_games_report_outcome() {
    for seed in 40..45 {
        let game = random_playout(seed, 400, |_| {});
        if !game.is_finished() {
            continue;
        }
        let last = game.moves().last().unwrap();
        match game.outcome() {
            Outcome::Checkmate => {
                assert!(last.mated);
                assert!(last.notation.ends_with('#'));
                assert_eq!(game.winner(), Some(last.color));
            }
            Outcome::Stalemate => {
                assert!(last.stale);
                assert!(last.notation.ends_with('S'));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_opening_move_count() {
    let game = Game::new();
    assert_eq!(legal_moves(&game).len(), 51);
    assert_eq!(game.board().legal_move_count(Color::Black), 51);
}

#[test]
fn test_en_passant_sequence() {
    let mut game = Game::new();
    game.do_move(Color::White, "k1", "k2", None).unwrap();
    game.do_move(Color::Black, "f7", "f6", None).unwrap();
    game.do_move(Color::White, "e4", "e6", None).unwrap();

    let allowed = game.allowed_moves(Color::Black, "f6").unwrap();
    assert!(allowed.contains(&"e5".to_string()));

    let mv = game.do_move(Color::Black, "f6", "e5", None).unwrap();
    assert!(mv.en_passant);
    assert_eq!(mv.notation, "xe5");
    assert!(game.board().tile("e6").unwrap().is_empty());
    assert_eq!(game.board().tile("e5").unwrap().piece(), Some(Piece::Pawn));
}

#[test]
fn test_en_passant_window_closes() {
    let mut game = Game::new();
    game.do_move(Color::White, "k1", "k2", None).unwrap();
    game.do_move(Color::Black, "f7", "f6", None).unwrap();
    game.do_move(Color::White, "e4", "e6", None).unwrap();
    game.do_move(Color::Black, "b7", "b6", None).unwrap();
    game.do_move(Color::White, "k2", "k3", None).unwrap();

    let allowed = game.allowed_moves(Color::Black, "f6").unwrap();
    assert!(!allowed.contains(&"e5".to_string()));
}

#[test]
fn test_stalemate_ends_game() {
    let mut board = Board::empty();
    board.place("f11", Piece::King, Color::Black).unwrap();
    board.place("f9", Piece::King, Color::White).unwrap();
    board.place("f6", Piece::Queen, Color::White).unwrap();

    let mut game = Game::with_board("stale", board);
    let mv = game.do_move(Color::White, "f6", "f7", None).unwrap();

    assert!(mv.stale);
    assert!(!mv.checked);
    assert_eq!(mv.notation, "Qf7S");
    assert_eq!(game.outcome(), Outcome::Stalemate);
    assert!(game.is_finished());
}

#[test]
fn test_promotion_through_game() {
    let mut board = Board::empty();
    board.place("f1", Piece::King, Color::White).unwrap();
    board.place("a1", Piece::King, Color::Black).unwrap();
    board.place("c7", Piece::Pawn, Color::White).unwrap();

    let mut game = Game::with_board("promo", board);
    assert_eq!(
        game.do_move(Color::White, "c7", "c8", Some("emperor")),
        Err(GameError::InvalidPromotion(Some("emperor".to_string())))
    );
    assert_eq!(game.current_turn(), Color::White);

    let mv = game.do_move(Color::White, "c7", "c8", Some("knight")).unwrap();
    assert_eq!(mv.notation, "c8=N");
    assert_eq!(game.board().tile("c8").unwrap().piece(), Some(Piece::Knight));
}

#[test]
fn test_json_store_survives_restart() {
    let dir = std::env::temp_dir().join(format!("hexchess-scenario-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store: Arc<dyn GameStore> = Arc::new(JsonFileStore::new(&dir));

    let mut game = Game::with_id("persisted-game").with_store(store.clone());
    game.do_move(Color::White, "e4", "e6", None).unwrap();
    assert!(game.do_move(Color::Black, "d9", "e7", None).is_err());
    game.do_move(Color::Black, "f7", "f6", None).unwrap();

    let reloaded = Game::load("persisted-game", store).unwrap();
    assert_eq!(reloaded.moves().len(), 2);
    assert_eq!(reloaded.board().squares(), game.board().squares());

    let _ = std::fs::remove_dir_all(&dir);
}
