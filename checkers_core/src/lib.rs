//! Rules engine and minimax opponent for English draughts on an 8×8 board.
//!
//! [`logic`] owns the board and move validation, [`engine`] picks the
//! computer's move.

pub mod engine;
pub mod logic;

pub use engine::config::EngineConfig;
pub use engine::eval::{FeatureScores, HeuristicEvaluator};
pub use engine::search::AlphaBetaEngine;
pub use engine::{Evaluator, Ply, SearchStats, Searcher};
pub use logic::board::{Board, BoardError, Cell, FenError, Piece, Side, Square};
pub use logic::game::{GameError, GameSession, GameStatus, PlyRecord};
pub use logic::generator::MoveGenerator;
pub use logic::rules::MoveStatus;
