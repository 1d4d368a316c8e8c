use crate::engine::Ply;
use crate::logic::board::{Board, Piece, Side, Square};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of [`Board::apply_ply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveStatus {
    InvalidMove,
    /// A simple move was tried while a capture exists somewhere.
    MustCaptureFirst,
    ValidMove,
    /// Capture applied; the same piece must jump again.
    CaptureAgain,
    WasCaptureMove,
}

impl MoveStatus {
    /// Whether the board changed.
    pub const fn is_applied(self) -> bool {
        matches!(
            self,
            Self::ValidMove | Self::CaptureAgain | Self::WasCaptureMove
        )
    }

    pub const fn ends_turn(self) -> bool {
        matches!(self, Self::ValidMove | Self::WasCaptureMove)
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidMove => "Invalid Move",
            Self::MustCaptureFirst => "Capture First",
            Self::ValidMove => "Valid Move",
            Self::CaptureAgain => "Capture Again",
            Self::WasCaptureMove => "Was Capture Move",
        })
    }
}

impl Board {
    /// Validates and applies one ply for `side`. Nothing changes unless the
    /// returned status is an applied one.
    pub fn apply_ply(&mut self, from: Square, to: Square, side: Side) -> MoveStatus {
        let Some(piece) = self.piece_at(from).filter(|p| p.side == side) else {
            return MoveStatus::InvalidMove;
        };
        if !self.is_empty(to) {
            return MoveStatus::InvalidMove;
        }

        let (d_row, d_col) = from.delta(to);
        if !piece.is_king() && d_row.signum() != side.forward() {
            return MoveStatus::InvalidMove;
        }

        match (d_row.abs(), d_col.abs()) {
            (1, 1) => {
                if self.has_available_capture(side) {
                    return MoveStatus::MustCaptureFirst;
                }
                self.relocate(from, to, piece);
                trace!("{side} {from} -> {to}");
                MoveStatus::ValidMove
            }
            (2, 2) => {
                let Some(over) = from.midpoint(to) else {
                    return MoveStatus::InvalidMove;
                };
                if !self.piece_at(over).is_some_and(|p| p.is_enemy_of(side)) {
                    return MoveStatus::InvalidMove;
                }
                self.set_piece(over, None);
                self.relocate(from, to, piece);
                trace!("{side} {from} x{over} -> {to}");

                if self.can_capture_from(to, side) {
                    MoveStatus::CaptureAgain
                } else {
                    MoveStatus::WasCaptureMove
                }
            }
            _ => MoveStatus::InvalidMove,
        }
    }

    /// Plays `ply` without validation, crowning on the far row. Used by the
    /// search on its private copies.
    pub fn apply_unchecked(&mut self, ply: Ply) {
        let Some(piece) = self.piece_at(ply.from) else {
            return;
        };
        if let Some(captured) = ply.captured {
            self.set_piece(captured, None);
        }
        self.relocate(ply.from, ply.to, piece);
    }

    /// Moves `piece` and crowns a man reaching its promotion row.
    fn relocate(&mut self, from: Square, to: Square, piece: Piece) {
        self.set_piece(from, None);
        let piece = if !piece.is_king() && to.row() == piece.side.promotion_row() {
            Piece::king(piece.side)
        } else {
            piece
        };
        self.set_piece(to, Some(piece));
    }

    /// Landing and jumped squares for every jump `piece` has from `from`.
    pub fn jumps_from(
        &self,
        from: Square,
        piece: Piece,
    ) -> impl Iterator<Item = (Square, Square)> + '_ {
        piece.directions().iter().filter_map(move |&(dr, dc)| {
            let over = from.offset(dr, dc)?;
            let land = from.offset(2 * dr, 2 * dc)?;
            let enemy = self.piece_at(over).is_some_and(|p| p.is_enemy_of(piece.side));
            (enemy && self.is_empty(land)).then_some((land, over))
        })
    }

    /// Empty squares one diagonal step away in `piece`'s directions.
    pub fn steps_from(&self, from: Square, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        piece
            .directions()
            .iter()
            .filter_map(move |&(dr, dc)| from.offset(dr, dc).filter(|&to| self.is_empty(to)))
    }

    /// Whether the piece on `sq`, moving as `side`, has a jump.
    pub fn can_capture_from(&self, sq: Square, side: Side) -> bool {
        self.piece_at(sq).is_some_and(|p| {
            let piece = Piece {
                side,
                crowned: p.crowned,
            };
            self.jumps_from(sq, piece).next().is_some()
        })
    }

    /// Whether any piece of `side` has a jump anywhere on the board.
    pub fn has_available_capture(&self, side: Side) -> bool {
        self.pieces(side)
            .any(|(sq, piece)| self.jumps_from(sq, piece).next().is_some())
    }

    /// Destinations for the piece on `sq` mapped to the squares they capture.
    /// Simple steps are dropped when the piece has a capture.
    pub fn legal_destinations(&self, sq: Square) -> BTreeMap<Square, Vec<Square>> {
        let mut moves = BTreeMap::new();
        let Some(piece) = self.piece_at(sq) else {
            return moves;
        };

        for to in self.steps_from(sq, piece) {
            moves.insert(to, Vec::new());
        }
        for (land, over) in self.jumps_from(sq, piece) {
            moves.insert(land, vec![over]);
        }

        if moves.values().any(|captured| !captured.is_empty()) {
            moves.retain(|_, captured| !captured.is_empty());
        }
        moves
    }

    /// The side left with pieces once the other has none.
    pub fn check_winner(&self) -> Option<Side> {
        if self.count(Side::Black) == 0 {
            Some(Side::Red)
        } else if self.count(Side::Red) == 0 {
            Some(Side::Black)
        } else {
            None
        }
    }
}
