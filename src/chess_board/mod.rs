pub mod board;
pub mod fen;
pub mod model;
pub mod zobrist_hash;
pub use board::{Board, BoardError, MoveMatrix};
pub use model::{ChessField, ChessPosition, Color, Move, Piece, PieceId, PieceType, PositionError, BOARD_SIZE};
pub use zobrist_hash::ZobristHash;
pub use zobrist_hash::ZOBRIST;

mod move_generation;
#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod tests {
    use super::model::to_algebraic_square;
    use super::*;

    #[test]
    fn test_convertion_method() {
        assert_eq!("b2".parse::<ChessPosition>().unwrap().to_field(), ChessField::new(6, 1));
        assert_eq!("a8".parse::<ChessPosition>().unwrap().to_field(), ChessField::new(0, 0));
        assert_eq!("h1".parse::<ChessPosition>().unwrap().to_field(), ChessField::new(7, 7));
        assert_eq!(ChessField::new(6, 1).as_algebraic(), "b2");
        assert_eq!(to_algebraic_square(0, 7), "h8");
        assert_eq!(Move::from_algebraic("e2e4").unwrap().as_algebraic(), "e2e4");
        assert_eq!(Move::from_algebraic("e2 e4"), Move::from_algebraic("e2-e4"));
    }

    #[test]
    fn test_display_coordinates_are_a_bijection() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let field = ChessField::new(row, col);
                let position = ChessPosition::from_field(field).unwrap();
                assert_eq!(position.to_field(), field);
                assert_eq!(position.to_string().parse::<ChessPosition>(), Ok(position));
            }
        }
    }

    #[test]
    fn test_invalid_positions() {
        assert!("i1".parse::<ChessPosition>().is_err());
        assert!("a9".parse::<ChessPosition>().is_err());
        assert!("a0".parse::<ChessPosition>().is_err());
        assert!("a".parse::<ChessPosition>().is_err());
        assert!("a10".parse::<ChessPosition>().is_err());
        assert!(ChessPosition::from_field(ChessField::new(8, 0)).is_err());
        assert!(Move::from_algebraic("e2e9").is_err());
        assert!(Move::from_algebraic("e2").is_err());
    }

    #[test]
    fn test_positions_are_always_on_the_board() {
        let e2 = ChessPosition::new('e', 2).unwrap();
        assert_eq!((e2.column(), e2.row()), ('e', 2));
        assert!(ChessPosition::new('a', 9).is_err());
        assert!(ChessPosition::new('a', 0).is_err());
        assert!(ChessPosition::new('`', 1).is_err());
        assert!(ChessPosition::new('i', 1).is_err());

        for column in 'a'..='h' {
            for row in 1..=BOARD_SIZE {
                let field = ChessPosition::new(column, row).unwrap().to_field();
                assert!(field.row < BOARD_SIZE && field.col < BOARD_SIZE);
            }
        }
    }

    #[test]
    fn test_piece_chars() {
        let knight = Piece::new(PieceId(0), Color::Black, PieceType::Knight);
        assert_eq!(knight.to_char(), 'n');
        assert_eq!(Piece { color: Color::White, ..knight }.to_string(), "N");
        assert_eq!(Color::White.opposite(), Color::Black);
    }
}
