use checkers_core::engine::config::EngineConfig;
use checkers_core::engine::search::AlphaBetaEngine;
use checkers_core::engine::{Ply, Searcher};
use checkers_core::logic::board::{Board, Cell, Piece, Side, Square};
use checkers_core::logic::game::{GameSession, GameStatus};
use checkers_core::logic::rules::MoveStatus;
use std::sync::Arc;

fn sq(row: usize, col: usize) -> Square {
    Square::new(row, col).expect("playable square")
}

fn board_from(fen: &str) -> Board {
    Board::from_fen_string(fen).expect("valid FEN").0
}

#[test]
fn start_layout_has_twelve_men_each() {
    let board = Board::new();
    assert_eq!(board.count(Side::Black), 12);
    assert_eq!(board.count(Side::Red), 12);
    assert_eq!(board.kings(Side::Black) + board.kings(Side::Red), 0);

    for row in 0..8 {
        for col in 0..8 {
            let cell = board.cell_at(row, col).expect("on board");
            match (row, (row + col) % 2) {
                (_, 0) => assert_eq!(cell, Cell::Unplayable),
                (0..=2, _) => assert_eq!(cell, Cell::Occupied(Piece::RED_MAN)),
                (3..=4, _) => assert_eq!(cell, Cell::Empty),
                _ => assert_eq!(cell, Cell::Occupied(Piece::BLACK_MAN)),
            }
        }
    }
}

#[test]
fn opening_step_is_valid() {
    let mut board = Board::new();
    assert_eq!(
        board.apply_ply(sq(5, 0), sq(4, 1), Side::Black),
        MoveStatus::ValidMove
    );
    assert_eq!(board.piece_at(sq(4, 1)), Some(Piece::BLACK_MAN));
}

#[test]
fn single_jump_removes_the_captured_man() {
    let mut session = GameSession::new();
    assert_eq!(session.play(sq(5, 2), sq(4, 3)), Ok(MoveStatus::ValidMove));
    assert_eq!(session.play(sq(2, 5), sq(3, 4)), Ok(MoveStatus::ValidMove));

    assert_eq!(
        session.play(sq(5, 0), sq(4, 1)),
        Ok(MoveStatus::MustCaptureFirst)
    );
    assert_eq!(
        session.play(sq(4, 3), sq(2, 5)),
        Ok(MoveStatus::WasCaptureMove)
    );
    assert!(session.board().is_empty(sq(3, 4)));
    assert_eq!(session.board().piece_at(sq(2, 5)), Some(Piece::BLACK_MAN));
    assert_eq!(session.board().count(Side::Red), 11);
    assert_eq!(session.turn(), Side::Red);
}

#[test]
fn forced_capture_blocks_simple_moves() {
    let mut board = board_from("8/8/8/8/3r4/2b5/7b/8 b");
    let before = board.clone();
    assert_eq!(
        board.apply_ply(sq(6, 7), sq(5, 6), Side::Black),
        MoveStatus::MustCaptureFirst
    );
    assert_eq!(board, before);
}

#[test]
fn crowned_black_king_moves_backward() {
    let mut session = GameSession::from_fen("8/2b5/8/8/8/8/5r2/8 b").expect("valid FEN");
    assert_eq!(session.play(sq(1, 2), sq(0, 1)), Ok(MoveStatus::ValidMove));
    assert_eq!(session.board().piece_at(sq(0, 1)), Some(Piece::BLACK_KING));

    let destinations = session.board().legal_destinations(sq(0, 1));
    assert!(destinations.contains_key(&sq(1, 0)));
    assert!(destinations.contains_key(&sq(1, 2)));
}

#[test]
fn capture_chain_through_the_session() {
    let mut session = GameSession::from_fen("8/8/5r2/8/3r4/2b5/8/8 b").expect("valid FEN");
    assert_eq!(session.play(sq(5, 2), sq(3, 4)), Ok(MoveStatus::CaptureAgain));
    assert_eq!(session.turn(), Side::Black);
    assert_eq!(session.play(sq(3, 4), sq(1, 6)), Ok(MoveStatus::WasCaptureMove));
    assert_eq!(session.status(), GameStatus::Won(Side::Black));
}

#[test]
fn no_red_pieces_means_black_wins() {
    let board = board_from("8/8/8/8/8/8/1b6/8 r");
    assert_eq!(board.check_winner(), Some(Side::Black));
}

#[test]
fn single_legal_red_move_is_returned() {
    let board = board_from("8/8/7r/8/8/8/8/b7 r");
    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
    assert_eq!(
        engine.best_move(&board, Side::Red, None),
        Some(Ply::new(sq(2, 7), sq(3, 6)))
    );
}

#[test]
fn engine_turn_finishes_a_capture_chain() {
    let mut session = GameSession::from_fen("8/8/5r2/8/3r4/2b5/8/8 b").expect("valid FEN");
    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));

    let played = session.play_engine_turn(&mut engine);
    assert_eq!(
        played,
        vec![
            (Ply::new(sq(5, 2), sq(3, 4)), MoveStatus::CaptureAgain),
            (Ply::new(sq(3, 4), sq(1, 6)), MoveStatus::WasCaptureMove),
        ]
    );
    assert_eq!(session.status(), GameStatus::Won(Side::Black));
    assert_eq!(session.turn(), Side::Red);
}
