use thiserror::Error;

use super::{ChessField, Piece, PieceId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a board needs at least one row and one column, got {rows}x{columns}")]
    InvalidDimensions { rows: u8, columns: u8 },
    #[error("field ({}, {}) is not on the board", .0.row, .0.col)]
    OutOfBounds(ChessField),
    #[error("field {} is already occupied", .0.as_algebraic())]
    SquareOccupied(ChessField),
    #[error("there is no piece on field {}", .0.as_algebraic())]
    NoPiece(ChessField),
}

/// Rectangular grid of optional pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    columns: u8,
    squares: Vec<Option<Piece>>,
}

impl Board {
    pub fn new(rows: u8, columns: u8) -> Result<Self, BoardError> {
        if rows == 0 || columns == 0 {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            squares: vec![None; rows as usize * columns as usize],
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Removes the occupant of `field`, failing when the field is empty.
    pub fn take_piece(&mut self, field: ChessField) -> Result<Piece, BoardError> {
        self.remove_piece(field)?.ok_or(BoardError::NoPiece(field))
    }

    pub fn position_exists(&self, field: ChessField) -> bool {
        field.row < self.rows && field.col < self.columns
    }

    fn index(&self, field: ChessField) -> Result<usize, BoardError> {
        if !self.position_exists(field) {
            return Err(BoardError::OutOfBounds(field));
        }
        Ok(field.row as usize * self.columns as usize + field.col as usize)
    }

    pub fn piece(&self, field: ChessField) -> Result<Option<&Piece>, BoardError> {
        let i = self.index(field)?;
        Ok(self.squares[i].as_ref())
    }

    pub fn there_is_a_piece(&self, field: ChessField) -> Result<bool, BoardError> {
        Ok(self.piece(field)?.is_some())
    }

    /// Places `piece` on an empty field. Never replaces an occupant.
    pub fn place_piece(&mut self, piece: Piece, field: ChessField) -> Result<(), BoardError> {
        let i = self.index(field)?;
        if self.squares[i].is_some() {
            return Err(BoardError::SquareOccupied(field));
        }
        self.squares[i] = Some(piece);
        Ok(())
    }

    pub fn remove_piece(&mut self, field: ChessField) -> Result<Option<Piece>, BoardError> {
        let i = self.index(field)?;
        Ok(self.squares[i].take())
    }

    /// Field currently holding the piece with `id`.
    pub fn locate(&self, id: PieceId) -> Option<ChessField> {
        self.squares
            .iter()
            .position(|square| matches!(square, Some(p) if p.id == id))
            .map(|i| ChessField::new((i / self.columns as usize) as u8, (i % self.columns as usize) as u8))
    }

    /// Returns an iterator over all pieces on the board along with their coordinates.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (ChessField, &Piece)> {
        let columns = self.columns as usize;
        self.squares.iter().enumerate().filter_map(move |(i, square)| {
            square
                .as_ref()
                .map(|piece| (ChessField::new((i / columns) as u8, (i % columns) as u8), piece))
        })
    }

    /// Copies of all cells, row by row.
    pub fn to_rows(&self) -> Vec<Vec<Option<Piece>>> {
        self.squares
            .chunks(self.columns as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Legality matrix of one piece: a marked cell is a destination the piece
/// may reach given the current occupancy, self-check not considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMatrix {
    rows: u8,
    columns: u8,
    cells: Vec<bool>,
}

impl MoveMatrix {
    pub fn new(rows: u8, columns: u8) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows as usize * columns as usize],
        }
    }

    pub fn for_board(board: &Board) -> Self {
        Self::new(board.rows(), board.columns())
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn mark(&mut self, field: ChessField) {
        if field.row < self.rows && field.col < self.columns {
            self.cells[field.row as usize * self.columns as usize + field.col as usize] = true;
        }
    }

    pub fn is_marked(&self, field: ChessField) -> bool {
        field.row < self.rows
            && field.col < self.columns
            && self.cells[field.row as usize * self.columns as usize + field.col as usize]
    }

    pub fn any(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    pub fn marked_fields(&self) -> impl Iterator<Item = ChessField> + '_ {
        let columns = self.columns as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, marked)| **marked)
            .map(move |(i, _)| ChessField::new((i / columns) as u8, (i % columns) as u8))
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.columns as usize).map(|row| row.to_vec()).collect()
    }
}
