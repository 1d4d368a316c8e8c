use checkers_core::{GameSession, GameStatus, MoveGenerator, MoveStatus};
use rand::seq::SliceRandom;
use rand::Rng;

/// Plays up to `turns` random turns, following any capture chain to its end.
/// Only plies the rules accept are drawn. Returns the number of plies played.
pub fn play_random_opening<R: Rng + ?Sized>(
    session: &mut GameSession,
    turns: usize,
    rng: &mut R,
) -> usize {
    let generator = MoveGenerator::new();
    let mut plies = 0;

    for _ in 0..turns {
        loop {
            if session.status() != GameStatus::Playing {
                return plies;
            }

            let mut moves = generator.generate_forced_moves(session.board(), session.turn());
            if let Some(pending) = session.pending_capture() {
                moves.retain(|ply| ply.from == pending);
            }
            let Some(ply) = moves.choose(rng).copied() else {
                return plies;
            };

            match session.play(ply.from, ply.to) {
                Ok(MoveStatus::CaptureAgain) => plies += 1,
                Ok(status) if status.is_applied() => {
                    plies += 1;
                    break;
                }
                Ok(_) | Err(_) => return plies,
            }
        }
    }

    plies
}
