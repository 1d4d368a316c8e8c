use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::{Evaluator, Ply, SearchStats, Searcher};
use crate::logic::board::{Board, Side, Square};
use crate::logic::generator::MoveGenerator;
use log::debug;
use std::sync::Arc;
use std::time::Instant;

pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: HeuristicEvaluator,
    generator: MoveGenerator,
    nodes_searched: u32,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: HeuristicEvaluator::new(config.clone()),
            generator: MoveGenerator::new(),
            config,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = HeuristicEvaluator::new(config.clone());
        self.config = config;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plies the search considers for `side`.
    pub fn candidate_moves(&self, board: &Board, side: Side) -> Vec<Ply> {
        if self.config.forced_capture_in_search {
            self.generator.generate_forced_moves(board, side)
        } else {
            self.generator.generate_moves(board, side)
        }
    }

    /// Score of `board` for `ai_side`. The AI moves on maximizing plies, its
    /// opponent on minimizing ones.
    pub fn minimax(
        &mut self,
        board: &Board,
        ai_side: Side,
        depth: u8,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        self.nodes_searched += 1;

        if depth == 0 || board.check_winner().is_some() {
            return self.evaluator.evaluate(board, ai_side);
        }

        let to_move = if maximizing { ai_side } else { ai_side.opposite() };
        let moves = self.candidate_moves(board, to_move);

        if maximizing {
            let mut max_eval = f64::NEG_INFINITY;
            for ply in moves {
                let mut child = board.clone();
                child.apply_unchecked(ply);
                let score = self.minimax(&child, ai_side, depth - 1, false, alpha, beta);
                max_eval = max_eval.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = f64::INFINITY;
            for ply in moves {
                let mut child = board.clone();
                child.apply_unchecked(ply);
                let score = self.minimax(&child, ai_side, depth - 1, true, alpha, beta);
                min_eval = min_eval.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        board: &Board,
        side: Side,
        must_continue_from: Option<Square>,
    ) -> Option<(Ply, SearchStats)> {
        self.nodes_searched = 0;
        let start = Instant::now();

        if board.check_winner().is_some() {
            return None;
        }

        let mut moves = self.candidate_moves(board, side);
        if let Some(from) = must_continue_from {
            moves.retain(|ply| ply.from == from);
        }

        let depth = self.config.search_depth;
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best: Option<(Ply, f64)> = None;

        for ply in moves {
            let mut child = board.clone();
            child.apply_unchecked(ply);
            let score = self.minimax(&child, side, depth, false, alpha, beta);

            // The first candidate is kept even at -inf.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((ply, score));
            }

            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }

        let (ply, score) = best?;
        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            score,
        };
        debug!(
            "{side} plays {ply} score={:.2} depth={} nodes={} time={}ms",
            stats.score, stats.depth, stats.nodes, stats.time_ms
        );
        Some((ply, stats))
    }
}
