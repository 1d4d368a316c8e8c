use crate::engine::{Ply, Searcher};
use crate::logic::board::{Board, FenError, Piece, Side, Square};
use crate::logic::generator::MoveGenerator;
use crate::logic::rules::MoveStatus;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("game is over, {0} won")]
    GameOver(Side),
    #[error("a capture must continue from {0}")]
    MustContinueWith(Square),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlyRecord {
    pub ply: Ply,
    pub side: Side,
    pub piece: Piece,
    pub status: MoveStatus,
    /// Position before the ply, restored by undo.
    pub before: Board,
    pub pending_before: Option<Square>,
    /// Hash of the position after the ply, with the side then to move.
    pub hash: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    turn: Side,
    status: GameStatus,
    pending_capture: Option<Square>,
    last_move: Option<Ply>,
    initial_hash: u64,
    history: Vec<PlyRecord>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starting layout, Black to move.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Board::new(), Side::Black)
    }

    pub fn from_position(board: Board, turn: Side) -> Self {
        let status = board
            .check_winner()
            .map_or(GameStatus::Playing, GameStatus::Won);
        Self {
            initial_hash: board.hash(turn),
            board,
            turn,
            status,
            pending_capture: None,
            last_move: None,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let (board, turn) = Board::from_fen_string(fen)?;
        Ok(Self::from_position(board, turn))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn turn(&self) -> Side {
        self.turn
    }

    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Square a multi-jump must continue from, if one is in progress.
    pub const fn pending_capture(&self) -> Option<Square> {
        self.pending_capture
    }

    pub const fn last_move(&self) -> Option<Ply> {
        self.last_move
    }

    pub fn history(&self) -> &[PlyRecord] {
        &self.history
    }

    pub fn to_fen_string(&self) -> String {
        self.board.to_fen_string(self.turn)
    }

    /// Plays one ply for the side to move.
    ///
    /// Rule violations come back as `Ok` with a rejecting [`MoveStatus`] and
    /// leave the session untouched. On [`MoveStatus::CaptureAgain`] the same
    /// side keeps the turn and must continue from the landing square.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveStatus, GameError> {
        if let GameStatus::Won(winner) = self.status {
            return Err(GameError::GameOver(winner));
        }
        if let Some(pending) = self.pending_capture {
            if pending != from {
                return Err(GameError::MustContinueWith(pending));
            }
        }

        let side = self.turn;
        let Some(piece) = self.board.piece_at(from) else {
            return Ok(MoveStatus::InvalidMove);
        };
        let before = self.board.clone();
        let status = self.board.apply_ply(from, to, side);
        if !status.is_applied() {
            return Ok(status);
        }

        let ply = Ply::new(from, to);
        let pending_before = self.pending_capture;
        if status == MoveStatus::CaptureAgain {
            self.pending_capture = Some(to);
        } else {
            self.pending_capture = None;
            self.turn = side.opposite();
        }

        self.history.push(PlyRecord {
            ply,
            side,
            piece,
            status,
            before,
            pending_before,
            hash: self.board.hash(self.turn),
        });
        self.last_move = Some(ply);
        debug!("{side} {ply}: {status}");

        self.update_status();
        Ok(status)
    }

    /// Lets `searcher` play the whole turn for the side to move, following
    /// every capture chain. Returns the plies tried, in order.
    ///
    /// A ply the rules reject forfeits the rest of the turn.
    pub fn play_engine_turn<S: Searcher + ?Sized>(
        &mut self,
        searcher: &mut S,
    ) -> Vec<(Ply, MoveStatus)> {
        let mut played = Vec::new();

        while self.status == GameStatus::Playing {
            let side = self.turn;
            let Some(ply) = searcher.best_move(&self.board, side, self.pending_capture) else {
                break;
            };
            let Ok(status) = self.play(ply.from, ply.to) else {
                break;
            };
            played.push((ply, status));

            match status {
                MoveStatus::CaptureAgain => {}
                MoveStatus::ValidMove | MoveStatus::WasCaptureMove => break,
                MoveStatus::InvalidMove | MoveStatus::MustCaptureFirst => {
                    warn!("{side} engine ply {ply} rejected ({status}), turn passes");
                    self.pending_capture = None;
                    self.turn = side.opposite();
                    break;
                }
            }
        }

        played
    }

    /// Takes back the last applied ply, including one step of a multi-jump.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };

        self.board = record.before;
        self.turn = record.side;
        self.pending_capture = record.pending_before;
        self.last_move = self.history.last().map(|prev| prev.ply);
        self.update_status();
        true
    }

    /// Times the current position, with the same side to move, has occurred
    /// in this session, counting the present one.
    pub fn repetition_count(&self) -> usize {
        let current = self.board.hash(self.turn);
        std::iter::once(self.initial_hash)
            .chain(self.history.iter().map(|record| record.hash))
            .filter(|&hash| hash == current)
            .count()
    }

    /// Whether the side to move has any step or jump.
    pub fn can_move(&self) -> bool {
        MoveGenerator::new().has_legal_moves(&self.board, self.turn)
    }

    /// Destinations the side to move could play from `sq` right now, mapped
    /// to the squares they capture.
    pub fn legal_destinations(&self, sq: Square) -> BTreeMap<Square, Vec<Square>> {
        let movable = self.status == GameStatus::Playing
            && self.pending_capture.is_none_or(|pending| pending == sq)
            && self.board.piece_at(sq).is_some_and(|p| p.side == self.turn);
        if !movable {
            return BTreeMap::new();
        }

        let mut destinations = self.board.legal_destinations(sq);
        if self.board.has_available_capture(self.turn) {
            destinations.retain(|_, captured| !captured.is_empty());
        }
        destinations
    }

    fn update_status(&mut self) {
        self.status = self
            .board
            .check_winner()
            .map_or(GameStatus::Playing, GameStatus::Won);
    }
}
