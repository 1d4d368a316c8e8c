use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Piece, Side, Square, BOARD_SIZE};
use crate::logic::eval_constants::{
    CENTER_KING, CENTER_MAN, CLUSTER_STEP, EDGE_BONUS, KING_BACK_ROW, MOBILITY_KING,
    MOBILITY_MAN, MULTI_JUMP_STEP, PROMOTION_STEP, TEMPO_SCALE, THREAT_BONUS,
    VULNERABLE_PENALTY,
};
use crate::logic::generator::MoveGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const NEIGHBOURS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Unweighted feature totals for one side. Own pieces add, enemy pieces
/// subtract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureScores {
    pub material: f64,
    pub mobility: f64,
    pub center_control: f64,
    pub promotion_potential: f64,
    pub king_safety: f64,
    pub threats: f64,
    pub multi_jump: f64,
    pub vulnerability: f64,
    pub clustering: f64,
    pub edge_safety: f64,
    pub tempo: f64,
}

impl FeatureScores {
    pub fn weighted_sum(&self, config: &EngineConfig) -> f64 {
        config.w_material * self.material
            + config.w_mobility * self.mobility
            + config.w_center_control * self.center_control
            + config.w_promotion_potential * self.promotion_potential
            + config.w_king_safety * self.king_safety
            + config.w_threats * self.threats
            + config.w_multi_jump * self.multi_jump
            + config.w_vulnerability * self.vulnerability
            + config.w_clustering * self.clustering
            + config.w_edge_safety * self.edge_safety
            + config.w_tempo * self.tempo
    }
}

pub struct HeuristicEvaluator {
    config: Arc<EngineConfig>,
    generator: MoveGenerator,
}

impl HeuristicEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            generator: MoveGenerator::new(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn features(&self, board: &Board, side: Side) -> FeatureScores {
        let mut scores = FeatureScores::default();
        let mut tempo_count = 0;

        for (sq, piece) in board.occupied() {
            let sign = if piece.side == side { 1.0 } else { -1.0 };
            let king = piece.is_king();

            let value = if king {
                self.config.val_king
            } else {
                self.config.val_man
            };
            scores.material += sign * f64::from(value);

            if sq.is_center() {
                scores.center_control += sign * f64::from(if king { CENTER_KING } else { CENTER_MAN });
            }

            if sq.is_edge() {
                scores.edge_safety += sign * f64::from(EDGE_BONUS);
            }

            if king {
                if sq.row() == 0 || sq.row() == BOARD_SIZE - 1 {
                    scores.king_safety += sign * f64::from(KING_BACK_ROW);
                }
            } else {
                let distance = sq.row().abs_diff(piece.side.promotion_row());
                scores.promotion_potential +=
                    sign * ((BOARD_SIZE - 1 - distance) as f64) * f64::from(PROMOTION_STEP);
            }

            let mobility = self.generator.count_piece_moves(board, sq, piece);
            let per_move = if king { MOBILITY_KING } else { MOBILITY_MAN };
            scores.mobility += sign * (mobility as f64) * f64::from(per_move);

            if board.jumps_from(sq, piece).next().is_some() {
                let chain = self.generator.max_jump_chain_length(board, sq, piece);
                scores.threats += sign * f64::from(THREAT_BONUS);
                scores.multi_jump += sign * (chain as f64) * f64::from(MULTI_JUMP_STEP);
            }

            if is_vulnerable(board, sq, piece) {
                scores.vulnerability -= sign * f64::from(VULNERABLE_PENALTY);
            }

            let cluster = NEIGHBOURS
                .iter()
                .filter_map(|&(dr, dc)| sq.offset(dr, dc))
                .filter(|&n| board.piece_at(n).is_some_and(|p| p.side == piece.side))
                .count();
            scores.clustering += sign * (cluster as f64) * f64::from(CLUSTER_STEP);

            // Only the evaluated side's men count toward tempo.
            if !king && piece.side == side {
                tempo_count += match side {
                    Side::Red => sq.row(),
                    Side::Black => BOARD_SIZE - 1 - sq.row(),
                };
            }
        }

        scores.tempo = tempo_count as f64 * TEMPO_SCALE;
        scores
    }
}

/// An enemy sits next to the piece in one of its move directions and the
/// square behind the piece is off-board or not held by its own side.
fn is_vulnerable(board: &Board, sq: Square, piece: Piece) -> bool {
    piece.directions().iter().any(|&(dr, dc)| {
        let threatened = sq
            .offset(dr, dc)
            .and_then(|n| board.piece_at(n))
            .is_some_and(|p| p.is_enemy_of(piece.side));
        threatened
            && !sq
                .offset(-dr, -dc)
                .and_then(|b| board.piece_at(b))
                .is_some_and(|p| p.side == piece.side)
    })
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, board: &Board, side: Side) -> f64 {
        self.features(board, side).weighted_sum(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> HeuristicEvaluator {
        HeuristicEvaluator::new(Arc::new(EngineConfig::default()))
    }

    fn board_from(fen: &str) -> Board {
        Board::from_fen_string(fen).unwrap().0
    }

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_start_position_is_balanced_except_tempo() {
        let eval = evaluator();
        let board = Board::new();
        let red = eval.features(&board, Side::Red);
        let black = eval.features(&board, Side::Black);

        assert!(red.material.abs() < f64::EPSILON);
        assert!(red.mobility.abs() < f64::EPSILON);
        assert!(red.clustering.abs() < f64::EPSILON);
        assert!(red.vulnerability.abs() < f64::EPSILON);
        // Red men sit on rows 0..=2: 4 * (0 + 1 + 2) = 12 rows of advance.
        assert!((red.tempo - 6.0).abs() < 1e-9);
        assert!((black.tempo - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_features_are_antisymmetric_except_tempo() {
        let eval = evaluator();
        let board = board_from("1r1r4/r7/5b2/4r3/3b4/2B5/8/b7 b");
        let red = eval.features(&board, Side::Red);
        let black = eval.features(&board, Side::Black);

        let pairs = [
            (red.material, black.material),
            (red.mobility, black.mobility),
            (red.center_control, black.center_control),
            (red.promotion_potential, black.promotion_potential),
            (red.king_safety, black.king_safety),
            (red.threats, black.threats),
            (red.multi_jump, black.multi_jump),
            (red.vulnerability, black.vulnerability),
            (red.clustering, black.clustering),
            (red.edge_safety, black.edge_safety),
        ];
        for (a, b) in pairs {
            assert!((a + b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn test_material_uses_configured_values() {
        let eval = evaluator();
        let board = board_from("8/8/8/8/8/8/8/B1b5 b");
        let black = eval.features(&board, Side::Black);
        assert!((black.material - 260.0).abs() < f64::EPSILON);
        assert!((black.king_safety - 15.0).abs() < f64::EPSILON);

        let red = eval.features(&board, Side::Red);
        assert!((red.material + 260.0).abs() < f64::EPSILON);
        assert!(red.tempo.abs() < f64::EPSILON);
    }

    #[test]
    fn test_threats_and_vulnerability() {
        // Black (5,2) can jump Red (4,3); Red's own jump is blocked by (6,1).
        let eval = evaluator();
        let board = board_from("8/8/8/8/3r4/2b5/1r6/8 b");
        let black = eval.features(&board, Side::Black);

        assert!((black.threats - 10.0).abs() < f64::EPSILON);
        assert!((black.multi_jump - 10.0).abs() < f64::EPSILON);
        // (5,2) and (4,3) face each other without backup.
        assert!(black.vulnerability.abs() < f64::EPSILON);
        assert!(is_vulnerable(&board, sq(5, 2), Piece::BLACK_MAN));
        assert!(is_vulnerable(&board, sq(4, 3), Piece::RED_MAN));
    }

    #[test]
    fn test_backup_removes_vulnerability() {
        // Black (6,1) stands behind Black (5,2) along the line to Red (4,3).
        let board = board_from("8/8/8/8/3r4/2b5/1b6/8 b");
        assert!(!is_vulnerable(&board, sq(5, 2), Piece::BLACK_MAN));
    }

    #[test]
    fn test_evaluate_prefers_material() {
        let eval = evaluator();
        let board = board_from("8/8/8/2r5/8/8/1b3b2/8 b");
        assert!(eval.evaluate(&board, Side::Black) > 0.0);
        assert!(eval.evaluate(&board, Side::Red) < 0.0);
    }
}
