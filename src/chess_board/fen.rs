use super::{Board, ChessField, Color, Piece, PieceId, PieceType, BOARD_SIZE};
use crate::error::ChessError;

pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

/// A position read from FEN, ready to become a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenPosition {
    pub board: Board,
    pub pieces_on_board: Vec<PieceId>,
    pub active_color: Color,
    pub turn: u32,
}

fn invalid(msg: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(msg.into())
}

fn home_row(color: Color) -> u8 {
    match color {
        Color::White => BOARD_SIZE - 2,
        Color::Black => 1,
    }
}

/// Parses the placement field of a FEN string into an 8x8 board.
///
/// Pieces get ids in reading order. A pawn away from its home rank is
/// considered to have moved already, so it loses the double step.
pub fn parse_placement(placement: &str) -> Result<(Board, Vec<PieceId>), ChessError> {
    let mut board = Board::new(BOARD_SIZE, BOARD_SIZE)?;
    let mut pieces = Vec::new();

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE as usize {
        return Err(invalid(format!("expected 8 rows, got {}", rows.len())));
    }

    for (row_index, row) in rows.iter().enumerate() {
        let mut col_index = 0usize;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                col_index += skip as usize;
                continue;
            }
            let (color, kind) = match c {
                'p' => (Color::Black, PieceType::Pawn),
                'r' => (Color::Black, PieceType::Rook),
                'n' => (Color::Black, PieceType::Knight),
                'b' => (Color::Black, PieceType::Bishop),
                'q' => (Color::Black, PieceType::Queen),
                'k' => (Color::Black, PieceType::King),
                'P' => (Color::White, PieceType::Pawn),
                'R' => (Color::White, PieceType::Rook),
                'N' => (Color::White, PieceType::Knight),
                'B' => (Color::White, PieceType::Bishop),
                'Q' => (Color::White, PieceType::Queen),
                'K' => (Color::White, PieceType::King),
                _ => return Err(invalid(format!("invalid piece character: {}", c))),
            };
            if col_index >= BOARD_SIZE as usize {
                return Err(invalid(format!("too many squares in row {}", row_index)));
            }

            let mut piece = Piece::new(PieceId(pieces.len() as u8), color, kind);
            if kind == PieceType::Pawn && row_index as u8 != home_row(color) {
                piece.increase_move_count();
            }
            board.place_piece(piece, ChessField::new(row_index as u8, col_index as u8))?;
            pieces.push(piece.id);
            col_index += 1;
        }
        if col_index != BOARD_SIZE as usize {
            return Err(invalid(format!("row {} has {} squares", row_index, col_index)));
        }
    }

    Ok((board, pieces))
}

/// Parses a FEN string. Only the placement is mandatory; castling and en
/// passant fields are checked for presence only since neither rule is played.
pub fn from_fen(fen: &str) -> Result<FenPosition, ChessError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.is_empty() || parts.len() > 6 {
        return Err(invalid("must have between 1 and 6 parts"));
    }

    let (board, pieces_on_board) = parse_placement(parts[0])?;
    for color in [Color::White, Color::Black] {
        let kings = board
            .pieces_with_coordinates()
            .filter(|(_, p)| p.kind == PieceType::King && p.color == color)
            .count();
        if kings != 1 {
            return Err(invalid(format!("expected one {} king, found {}", color, kings)));
        }
    }

    let active_color = match parts.get(1) {
        None | Some(&"w") => Color::White,
        Some(&"b") => Color::Black,
        Some(other) => return Err(invalid(format!("invalid active color: {}", other))),
    };

    let fullmove_number = match parts.get(5) {
        None => 1,
        Some(n) => n
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| invalid(format!("fullmove number is not a valid number: {}", n)))?,
    };
    if let Some(clock) = parts.get(4) {
        clock
            .parse::<u32>()
            .map_err(|_| invalid(format!("halfmove clock is not a valid number: {}", clock)))?;
    }

    let turn = fullmove_number
        .checked_mul(2)
        .and_then(|n| n.checked_add(u32::from(active_color == Color::Black)))
        .map(|n| n - 1)
        .ok_or_else(|| invalid(format!("fullmove number is too large: {}", fullmove_number)))?;

    Ok(FenPosition {
        board,
        pieces_on_board,
        active_color,
        turn,
    })
}

pub fn to_fen(board: &Board, active_color: Color, turn: u32) -> String {
    let mut board_representation = String::new();

    for (row_index, row) in board.to_rows().iter().enumerate() {
        let mut empty_count = 0;

        for square in row {
            match square {
                Some(piece) => {
                    if empty_count > 0 {
                        board_representation.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    board_representation.push(piece.to_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            board_representation.push_str(&empty_count.to_string());
        }

        if row_index + 1 < board.rows() as usize {
            board_representation.push('/');
        }
    }

    let active_color = if active_color == Color::White { "w" } else { "b" };
    let fullmove_number = turn / 2 + turn % 2;

    format!("{} {} - - 0 {}", board_representation, active_color, fullmove_number)
}
