// Piece Values
pub const VAL_MAN: i32 = 100;
pub const VAL_KING: i32 = 160;

// Per-piece feature contributions
pub const MOBILITY_MAN: i32 = 5;
pub const MOBILITY_KING: i32 = 8;
pub const CENTER_MAN: i32 = 8;
pub const CENTER_KING: i32 = 12;
pub const PROMOTION_STEP: i32 = 4;
pub const KING_BACK_ROW: i32 = 15;
pub const THREAT_BONUS: i32 = 10;
pub const MULTI_JUMP_STEP: i32 = 10;
pub const VULNERABLE_PENALTY: i32 = 15;
pub const CLUSTER_STEP: i32 = 2;
pub const EDGE_BONUS: i32 = 6;
pub const TEMPO_SCALE: f64 = 0.5;

// Feature weights
pub const W_MATERIAL: f64 = 1.0;
pub const W_MOBILITY: f64 = 0.4;
pub const W_CENTER_CONTROL: f64 = 0.3;
pub const W_PROMOTION_POTENTIAL: f64 = 0.3;
pub const W_KING_SAFETY: f64 = 0.4;
pub const W_THREATS: f64 = 0.6;
pub const W_MULTI_JUMP: f64 = 0.5;
pub const W_VULNERABILITY: f64 = 0.6;
pub const W_CLUSTERING: f64 = 0.3;
pub const W_EDGE_SAFETY: f64 = 0.2;
pub const W_TEMPO: f64 = 0.25;

pub const DEFAULT_SEARCH_DEPTH: u8 = 3;
