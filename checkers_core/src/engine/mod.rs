use crate::logic::board::{Board, Side, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod search;
pub mod zobrist;

/// One step or one jump by a single piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ply {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Square>,
}

impl Ply {
    /// The jumped square, if any, is derived from the geometry.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            captured: from.midpoint(to),
        }
    }

    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(captured) => write!(f, "{} x{} -> {}", self.from, captured, self.to),
            None => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
    pub score: f64,
}

pub trait Evaluator {
    /// Score of `board` from `side`'s point of view.
    fn evaluate(&self, board: &Board, side: Side) -> f64;
}

pub trait Searcher {
    /// Picks a ply for `side`. With `must_continue_from`, only plies
    /// starting on that square are considered.
    fn search(
        &mut self,
        board: &Board,
        side: Side,
        must_continue_from: Option<Square>,
    ) -> Option<(Ply, SearchStats)>;

    fn best_move(
        &mut self,
        board: &Board,
        side: Side,
        must_continue_from: Option<Square>,
    ) -> Option<Ply> {
        self.search(board, side, must_continue_from)
            .map(|(ply, _)| ply)
    }
}
