use crate::engine::zobrist::ZobristKeys;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Diagonal steps in the order every enumeration in the crate follows.
pub const KING_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const BLACK_MAN_DIRECTIONS: [(i8, i8); 2] = [(-1, -1), (-1, 1)];
const RED_MAN_DIRECTIONS: [(i8, i8); 2] = [(1, -1), (1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Black,
    Red,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Black => Self::Red,
            Self::Red => Self::Black,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::Red => 1,
        }
    }

    /// Row delta of a forward step. Black men climb toward row 0.
    pub const fn forward(self) -> i8 {
        match self {
            Self::Black => -1,
            Self::Red => 1,
        }
    }

    pub const fn promotion_row(self) -> usize {
        match self {
            Self::Black => 0,
            Self::Red => BOARD_SIZE - 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("Black"),
            Self::Red => f.write_str("Red"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub crowned: bool,
}

impl Piece {
    pub const BLACK_MAN: Self = Self::man(Side::Black);
    pub const BLACK_KING: Self = Self::king(Side::Black);
    pub const RED_MAN: Self = Self::man(Side::Red);
    pub const RED_KING: Self = Self::king(Side::Red);

    pub const fn man(side: Side) -> Self {
        Self {
            side,
            crowned: false,
        }
    }

    pub const fn king(side: Side) -> Self {
        Self {
            side,
            crowned: true,
        }
    }

    pub const fn is_king(self) -> bool {
        self.crowned
    }

    pub fn is_enemy_of(self, side: Side) -> bool {
        self.side != side
    }

    /// Directions this piece may step or jump in.
    pub const fn directions(self) -> &'static [(i8, i8)] {
        match (self.crowned, self.side) {
            (true, _) => &KING_DIRECTIONS,
            (false, Side::Black) => &BLACK_MAN_DIRECTIONS,
            (false, Side::Red) => &RED_MAN_DIRECTIONS,
        }
    }

    pub const fn symbol(self) -> char {
        match (self.side, self.crowned) {
            (Side::Black, false) => 'b',
            (Side::Black, true) => 'B',
            (Side::Red, false) => 'r',
            (Side::Red, true) => 'R',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'b' => Some(Self::BLACK_MAN),
            'B' => Some(Self::BLACK_KING),
            'r' => Some(Self::RED_MAN),
            'R' => Some(Self::RED_KING),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Light square. Never holds a piece.
    Unplayable,
    Empty,
    Occupied(Piece),
}

impl Cell {
    pub const fn piece(self) -> Option<Piece> {
        match self {
            Self::Occupied(piece) => Some(piece),
            Self::Unplayable | Self::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("({row}, {col}) is a light square")]
    Unplayable { row: usize, col: usize },
    #[error("({row}, {col}) holds a cell its square colour cannot hold")]
    MisplacedCell { row: usize, col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 8 rows, found {0}")]
    RowCount(usize),
    #[error("row {row} describes {len} cells")]
    RowLength { row: usize, len: usize },
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(char),
    #[error("missing or unknown side to move")]
    MissingSide,
    #[error(transparent)]
    Square(#[from] BoardError),
}

/// A playable (dark) square. Holding one proves the coordinates are on the
/// board and on a dark square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(row: usize, col: usize) -> Result<Self, BoardError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(BoardError::OutOfBounds { row, col });
        }
        if (row + col) % 2 == 0 {
            return Err(BoardError::Unplayable { row, col });
        }
        Ok(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    pub const fn row(self) -> usize {
        self.row as usize
    }

    pub const fn col(self) -> usize {
        self.col as usize
    }

    pub const fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// The square `(dr, dc)` away, if it exists and is playable.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = usize::try_from(i16::from(self.row) + i16::from(dr)).ok()?;
        let col = usize::try_from(i16::from(self.col) + i16::from(dc)).ok()?;
        Self::new(row, col).ok()
    }

    /// Signed (row, col) distance from `self` to `to`.
    pub fn delta(self, to: Self) -> (i8, i8) {
        #[allow(clippy::cast_possible_wrap)]
        let (from_row, from_col, to_row, to_col) =
            (self.row as i8, self.col as i8, to.row as i8, to.col as i8);
        (to_row - from_row, to_col - from_col)
    }

    /// The jumped square between `self` and `to` when they are a jump apart.
    pub fn midpoint(self, to: Self) -> Option<Self> {
        let (dr, dc) = self.delta(to);
        if dr.abs() == 2 && dc.abs() == 2 {
            self.offset(dr / 2, dc / 2)
        } else {
            None
        }
    }

    pub const fn is_edge(self) -> bool {
        self.row == 0 || self.col == 0 || self.row == 7 || self.col == 7
    }

    /// Inside the central 4x4 block.
    pub const fn is_center(self) -> bool {
        self.row >= 2 && self.row <= 5 && self.col >= 2 && self.col <= 5
    }

    /// All 32 playable squares, row-major.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_SQUARES).filter_map(|i| Self::new(i / BOARD_SIZE, i % BOARD_SIZE).ok())
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = BoardError;

    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(row, col)
    }
}

impl From<Square> for (usize, usize) {
    fn from(square: Square) -> Self {
        (square.row(), square.col())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    // Mailbox, row-major. Light squares stay `Cell::Unplayable`.
    grid: [Cell; NUM_SQUARES],
}

/// Wire form of [`Board`], checked on the way in.
#[derive(Serialize, Deserialize)]
struct RawBoard {
    #[serde(with = "BigArray")]
    grid: [Cell; NUM_SQUARES],
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        for (i, cell) in raw.grid.iter().enumerate() {
            let (row, col) = (i / BOARD_SIZE, i % BOARD_SIZE);
            let light = (row + col) % 2 == 0;
            if light != (*cell == Cell::Unplayable) {
                return Err(BoardError::MisplacedCell { row, col });
            }
        }
        Ok(Self { grid: raw.grid })
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        Self { grid: board.grid }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting layout: Red men on rows 0-2, Black men on rows 5-7.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    /// Every dark square empty.
    #[must_use]
    pub fn empty() -> Self {
        let mut board = Self {
            grid: [Cell::Unplayable; NUM_SQUARES],
        };
        board.clear();
        board
    }

    pub fn reset(&mut self) {
        self.clear();
        self.setup_initial_position();
    }

    pub fn clear(&mut self) {
        for sq in Square::all() {
            self.set_cell(sq, Cell::Empty);
        }
    }

    fn setup_initial_position(&mut self) {
        for sq in Square::all() {
            let cell = match sq.row() {
                0..=2 => Cell::Occupied(Piece::RED_MAN),
                5..=7 => Cell::Occupied(Piece::BLACK_MAN),
                _ => Cell::Empty,
            };
            self.set_cell(sq, cell);
        }
    }

    #[allow(clippy::indexing_slicing)]
    pub const fn get(&self, sq: Square) -> Cell {
        // Square::index is always < 64
        self.grid[sq.index()]
    }

    #[allow(clippy::indexing_slicing)]
    fn set_cell(&mut self, sq: Square, cell: Cell) {
        self.grid[sq.index()] = cell;
    }

    /// Raw cell lookup, including light squares.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        self.grid.get(row * BOARD_SIZE + col).copied()
    }

    pub const fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.get(sq).piece()
    }

    pub const fn is_empty(&self, sq: Square) -> bool {
        matches!(self.get(sq), Cell::Empty)
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.set_cell(sq, piece.map_or(Cell::Empty, Cell::Occupied));
    }

    /// Every piece on the board, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// `side`'s pieces, row-major.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.side == side)
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    pub fn kings(&self, side: Side) -> usize {
        self.pieces(side).filter(|(_, p)| p.is_king()).count()
    }

    /// Zobrist hash of the position with `turn` to move.
    pub fn hash(&self, turn: Side) -> u64 {
        let keys = ZobristKeys::get();
        let mut hash = self
            .occupied()
            .fold(0, |acc, (sq, piece)| acc ^ keys.get_piece_key(piece, sq));
        if turn == Side::Red {
            hash ^= keys.side_key;
        }
        hash
    }

    pub fn to_fen_string(&self, turn: Side) -> String {
        let mut fen = String::new();
        for row in 0..BOARD_SIZE {
            let mut empty_count = 0;
            for col in 0..BOARD_SIZE {
                match self.cell_at(row, col).and_then(Cell::piece) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.symbol());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row + 1 < BOARD_SIZE {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match turn {
            Side::Black => 'b',
            Side::Red => 'r',
        });
        fen
    }

    pub fn from_fen_string(fen: &str) -> Result<(Self, Side), FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().unwrap_or_default();
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_SIZE {
            return Err(FenError::RowCount(rows.len()));
        }

        let mut board = Self::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0;
            for symbol in text.chars() {
                if let Some(run) = symbol.to_digit(10) {
                    col += run as usize;
                    continue;
                }
                let piece = Piece::from_symbol(symbol).ok_or(FenError::UnknownSymbol(symbol))?;
                board.set_piece(Square::new(row, col)?, Some(piece));
                col += 1;
            }
            if col != BOARD_SIZE {
                return Err(FenError::RowLength { row, len: col });
            }
        }

        let turn = match parts.next() {
            Some("b") => Side::Black,
            Some("r") => Side::Red,
            _ => return Err(FenError::MissingSide),
        };
        Ok((board, turn))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2 3 4 5 6 7")?;
        for row in 0..BOARD_SIZE {
            write!(f, "{row}")?;
            for col in 0..BOARD_SIZE {
                let symbol = match self.cell_at(row, col) {
                    Some(Cell::Occupied(piece)) => piece.symbol(),
                    Some(Cell::Empty) => '.',
                    Some(Cell::Unplayable) | None => ' ',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
