use crate::logic::board::{Piece, Square};
use std::sync::OnceLock;

// 2 sides * crowned or not * 64 cells
const NUM_PIECE_KINDS: usize = 4;
const NUM_CELLS: usize = 64;
const TABLE_SIZE: usize = NUM_PIECE_KINDS * NUM_CELLS;

pub struct ZobristKeys {
    pub piece_keys: [u64; TABLE_SIZE],
    pub side_key: u64,
}

// Deterministic keys so hashes are stable across runs.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = XorShift64::new(0x9E37_79B9_7F4A_7C15);
        let mut piece_keys = [0; TABLE_SIZE];
        for key in &mut piece_keys {
            *key = rng.next();
        }
        let side_key = rng.next();

        Self {
            piece_keys,
            side_key,
        }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<ZobristKeys> = OnceLock::new();
        INSTANCE.get_or_init(ZobristKeys::new)
    }

    pub fn get_piece_key(&self, piece: Piece, sq: Square) -> u64 {
        let kind = piece.side.index() * 2 + usize::from(piece.crowned);
        self.piece_keys
            .get(kind * NUM_CELLS + sq.index())
            .copied()
            .unwrap_or_default()
    }
}
