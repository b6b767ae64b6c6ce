use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Board extent used by the display coordinates.
pub const BOARD_SIZE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "P"),
            PieceType::Knight => write!(f, "N"),
            PieceType::Bishop => write!(f, "B"),
            PieceType::Rook => write!(f, "R"),
            PieceType::Queen => write!(f, "Q"),
            PieceType::King => write!(f, "K"),
        }
    }
}

/// Identity of a piece for the whole lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u8);

/// A chess piece. Its field is never stored here, the board is the only
/// source of truth for where a piece stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub kind: PieceType,
    pub move_count: u32,
}

impl Piece {
    pub fn new(id: PieceId, color: Color, kind: PieceType) -> Self {
        Self {
            id,
            color,
            kind,
            move_count: 0,
        }
    }

    pub fn increase_move_count(&mut self) {
        self.move_count += 1;
    }

    pub fn decrease_move_count(&mut self) {
        self.move_count = self.move_count.saturating_sub(1);
    }

    pub fn to_char(&self) -> char {
        let c = match self.kind {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        };
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Internal zero based coordinate. Row 0 is rank 8.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct ChessField {
    pub row: u8,
    pub col: u8,
}

impl ChessField {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Field shifted by `(dr, dc)`, `None` when it leaves the first quadrant.
    /// Upper bounds are the board's business.
    pub fn offset(&self, dr: isize, dc: isize) -> Option<ChessField> {
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if row < 0 || col < 0 || row > u8::MAX as isize || col > u8::MAX as isize {
            return None;
        }
        Some(ChessField::new(row as u8, col as u8))
    }

    pub fn as_algebraic(&self) -> String {
        to_algebraic_square(self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid position '{0}': valid values are from a1 to h8")]
    Malformed(String),
    #[error("field ({row}, {col}) has no display coordinate")]
    OffBoard { row: u8, col: u8 },
}

/// Display coordinate: file letter and rank number, e.g. `e2`. Only built
/// through `new`, `from_field` or parsing, so `to_field` stays on the board.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct ChessPosition {
    column: char,
    row: u8,
}

impl ChessPosition {
    pub fn new(column: char, row: u8) -> Result<Self, PositionError> {
        if !('a'..='h').contains(&column) || !(1..=BOARD_SIZE).contains(&row) {
            return Err(PositionError::Malformed(format!("{}{}", column, row)));
        }
        Ok(Self { column, row })
    }

    pub fn column(&self) -> char {
        self.column
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn to_field(&self) -> ChessField {
        ChessField::new(BOARD_SIZE - self.row, self.column as u8 - b'a')
    }

    pub fn from_field(field: ChessField) -> Result<Self, PositionError> {
        if field.row >= BOARD_SIZE || field.col >= BOARD_SIZE {
            return Err(PositionError::OffBoard {
                row: field.row,
                col: field.col,
            });
        }
        Ok(Self {
            column: (b'a' + field.col) as char,
            row: BOARD_SIZE - field.row,
        })
    }
}

impl FromStr for ChessPosition {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(PositionError::Malformed(s.to_string()));
        };
        let rank = rank.to_digit(10).ok_or_else(|| PositionError::Malformed(s.to_string()))?;
        ChessPosition::new(file.to_ascii_lowercase(), rank as u8)
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct Move {
    pub from: ChessField,
    pub to: ChessField,
}

impl Move {
    pub fn new(from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> Self {
        Self {
            from: ChessField::new(from_row, from_col),
            to: ChessField::new(to_row, to_col),
        }
    }

    pub fn as_algebraic(&self) -> String {
        format!("{}{}", self.from.as_algebraic(), self.to.as_algebraic())
    }

    /// Parses `e2e4` (an optional separator between the squares is accepted).
    pub fn from_algebraic(algebraic: &str) -> Result<Self, PositionError> {
        let compact: String = algebraic.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if compact.len() != 4 || !compact.is_ascii() {
            return Err(PositionError::Malformed(algebraic.to_string()));
        }
        let from: ChessPosition = compact[0..2].parse()?;
        let to: ChessPosition = compact[2..4].parse()?;
        Ok(Self {
            from: from.to_field(),
            to: to.to_field(),
        })
    }
}

pub fn to_algebraic_square(row: u8, col: u8) -> String {
    let file = (b'a' + col) as char; // 0-7 column index to 'a'-'h'
    let rank = BOARD_SIZE.saturating_sub(row); // row 0 is rank 8
    format!("{}{}", file, rank)
}
