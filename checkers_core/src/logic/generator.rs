use crate::engine::Ply;
use crate::logic::board::{Board, Piece, Side, Square};

pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Moves for `side`, row-major. A piece that can jump lists only its
    /// jumps; other pieces list their steps even when some piece elsewhere
    /// could capture.
    pub fn generate_moves(&self, board: &Board, side: Side) -> Vec<Ply> {
        let mut moves = Vec::with_capacity(32);

        for (from, piece) in board.pieces(side) {
            let before = moves.len();
            moves.extend(
                board
                    .jumps_from(from, piece)
                    .map(|(to, _)| Ply::new(from, to)),
            );
            if moves.len() == before {
                moves.extend(board.steps_from(from, piece).map(|to| Ply::new(from, to)));
            }
        }

        moves
    }

    /// [`Self::generate_moves`] restricted to captures whenever one exists,
    /// i.e. exactly the plies `Board::apply_ply` would accept.
    pub fn generate_forced_moves(&self, board: &Board, side: Side) -> Vec<Ply> {
        let mut moves = self.generate_moves(board, side);
        if moves.iter().any(Ply::is_capture) {
            moves.retain(Ply::is_capture);
        }
        moves
    }

    /// Checks if `side` can move at all.
    /// Returns as soon as one step or jump is found.
    pub fn has_legal_moves(&self, board: &Board, side: Side) -> bool {
        board.pieces(side).any(|(sq, piece)| {
            board.jumps_from(sq, piece).next().is_some()
                || board.steps_from(sq, piece).next().is_some()
        })
    }

    /// Mobility of a single piece: with jumps available, the summed chain
    /// length from each landing square; otherwise the number of steps.
    pub fn count_piece_moves(&self, board: &Board, from: Square, piece: Piece) -> usize {
        let landings: Vec<Square> = board.jumps_from(from, piece).map(|(to, _)| to).collect();
        if landings.is_empty() {
            board.steps_from(from, piece).count()
        } else {
            landings
                .into_iter()
                .map(|land| self.max_jump_chain_length(board, land, piece))
                .sum()
        }
    }

    /// Longest run of consecutive jumps `piece` could make starting on
    /// `from`. Captured pieces stay on the board for this count. A branch
    /// that returns to a square it already stood on is dropped without
    /// counting, so a chain whose continuations only loop back never ends
    /// and the result falls to the floor of 1.
    pub fn max_jump_chain_length(&self, board: &Board, from: Square, piece: Piece) -> usize {
        let mut longest = 0;
        // (square, jumps so far, squares this branch stood on as a 64-bit mask)
        let mut stack: Vec<(Square, usize, u64)> = vec![(from, 0, 0)];

        while let Some((current, jumps, visited)) = stack.pop() {
            if visited & square_bit(current) != 0 {
                continue;
            }
            let visited = visited | square_bit(current);
            let mut extended = false;

            for &(dr, dc) in piece.directions() {
                let (Some(over), Some(land)) = (current.offset(dr, dc), current.offset(2 * dr, 2 * dc))
                else {
                    continue;
                };
                let jumpable = board.is_empty(land)
                    && board.piece_at(over).is_some_and(|p| p.is_enemy_of(piece.side))
                    && visited & square_bit(over) == 0;
                if jumpable {
                    stack.push((land, jumps + 1, visited));
                    extended = true;
                }
            }

            if !extended {
                longest = longest.max(jumps);
            }
        }

        longest.max(1)
    }
}

const fn square_bit(sq: Square) -> u64 {
    1 << sq.index()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn board_from(fen: &str) -> Board {
        Board::from_fen_string(fen).unwrap().0
    }

    #[test]
    fn test_opening_moves() {
        let generator = MoveGenerator::new();
        let board = Board::new();

        let black = generator.generate_moves(&board, Side::Black);
        assert_eq!(black.len(), 7);
        assert_eq!(black.first(), Some(&Ply::new(sq(5, 0), sq(4, 1))));
        assert!(black.iter().all(|ply| !ply.is_capture()));

        let red = generator.generate_moves(&board, Side::Red);
        assert_eq!(red.len(), 7);
        assert!(red.iter().all(|ply| ply.from.row() == 2 && ply.to.row() == 3));
    }

    #[test]
    fn test_capture_priority_is_per_piece() {
        // Black (5,2) can jump (4,3); Black (6,7) cannot jump.
        let board = board_from("8/8/8/8/3r4/2b5/7b/8 b");
        let generator = MoveGenerator::new();

        let moves = generator.generate_moves(&board, Side::Black);
        assert_eq!(
            moves,
            vec![
                Ply::new(sq(5, 2), sq(3, 4)),
                Ply::new(sq(6, 7), sq(5, 6)),
            ]
        );
        assert_eq!(moves.first().and_then(|ply| ply.captured), Some(sq(4, 3)));

        let forced = generator.generate_forced_moves(&board, Side::Black);
        assert_eq!(forced, vec![Ply::new(sq(5, 2), sq(3, 4))]);
    }

    #[test]
    fn test_has_legal_moves() {
        let generator = MoveGenerator::new();
        assert!(generator.has_legal_moves(&Board::new(), Side::Red));

        // Red man on (7,0) faces the edge and can never move.
        let board = board_from("8/8/8/8/8/8/8/r7 b");
        assert!(!generator.has_legal_moves(&board, Side::Red));
        assert!(!generator.has_legal_moves(&board, Side::Black));
    }

    #[test]
    fn test_chain_length_follows_consecutive_jumps() {
        let board = board_from("8/6r1/8/4r3/8/2r5/1b6/8 b");
        let generator = MoveGenerator::new();

        let length = generator.max_jump_chain_length(&board, sq(6, 1), Piece::BLACK_MAN);
        assert_eq!(length, 3);

        // Only one jump available from (6,1), landing on (4,3).
        let mobility = generator.count_piece_moves(&board, sq(6, 1), Piece::BLACK_MAN);
        assert_eq!(mobility, 2);
    }

    #[test]
    fn test_chain_length_floor() {
        let generator = MoveGenerator::new();
        let board = Board::new();
        assert_eq!(
            generator.max_jump_chain_length(&board, sq(5, 0), Piece::BLACK_MAN),
            1
        );
        assert_eq!(
            generator.count_piece_moves(&board, sq(5, 2), Piece::BLACK_MAN),
            2
        );
    }

    #[test]
    fn test_king_cycle_terminates() {
        // A king on (2,3) with four men around (4,3): every branch circles
        // back onto a square it stood on, so no chain ever ends and the
        // count falls to the floor.
        let board = board_from("8/8/3R4/2b1b3/8/2b1b3/8/8 r");
        let generator = MoveGenerator::new();
        let length = generator.max_jump_chain_length(&board, sq(2, 3), Piece::RED_KING);
        assert_eq!(length, 1);
    }
}
