use crate::opening::play_random_opening;
use checkers_core::{GameSession, GameStatus, Searcher, Side};
use rand::Rng;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub max_plies: usize,
    pub random_openings: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Side),
    /// The side to move had nothing to play.
    Stuck(Side),
    /// Both sides forfeited their turn in a row, so the position can no
    /// longer change.
    Stalled,
    Repetition,
    PlyLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Won(side) => write!(f, "{side} wins"),
            Self::Stuck(side) => write!(f, "{side} has no move"),
            Self::Stalled => f.write_str("both sides forfeited their turn"),
            Self::Repetition => f.write_str("draw by threefold repetition"),
            Self::PlyLimit => f.write_str("stopped at ply limit"),
        }
    }
}

pub struct MatchReport {
    pub outcome: Outcome,
    /// Plies actually applied to the board.
    pub plies: usize,
    pub session: GameSession,
}

/// Plays `session` out between two engines. `plies` in the report counts
/// only plies the rules accepted.
pub fn play_match<R: Rng + ?Sized>(
    mut session: GameSession,
    black: &mut dyn Searcher,
    red: &mut dyn Searcher,
    options: MatchOptions,
    rng: &mut R,
) -> MatchReport {
    let mut plies = play_random_opening(&mut session, options.random_openings, rng);
    if plies > 0 {
        info!("opening: {plies} random plies, {}", session.to_fen_string());
    }
    let mut forfeits = 0;

    let outcome = loop {
        if let GameStatus::Won(side) = session.status() {
            break Outcome::Won(side);
        }
        let side = session.turn();
        if !session.can_move() {
            break Outcome::Stuck(side);
        }
        if forfeits >= 2 {
            break Outcome::Stalled;
        }
        if session.repetition_count() >= 3 {
            break Outcome::Repetition;
        }
        if plies >= options.max_plies {
            break Outcome::PlyLimit;
        }

        let engine: &mut dyn Searcher = match side {
            Side::Black => &mut *black,
            Side::Red => &mut *red,
        };
        let played = session.play_engine_turn(engine);
        if played.is_empty() {
            break Outcome::Stuck(side);
        }

        let before = plies;
        for (ply, status) in &played {
            if status.is_applied() {
                plies += 1;
                debug!("{plies:>4}. {side} {ply} ({status})");
            } else {
                debug!("      {side} {ply} rejected ({status})");
            }
        }
        forfeits = if plies == before { forfeits + 1 } else { 0 };
    };

    info!("{outcome} after {plies} plies");
    MatchReport {
        outcome,
        plies,
        session,
    }
}
