use super::{Board, ChessField, Color, Piece, PieceType, BOARD_SIZE};
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::sync::Arc;

const SQUARES: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// Zobrist keys for placement and side to move of an 8x8 match.
pub struct ZobristHash {
    piece_keys: [[[u64; SQUARES]; 6]; 2],
    side_to_move_key: u64,
}

impl ZobristHash {
    fn new(seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);

        // Random numbers for pieces on squares
        let mut piece_keys = [[[0; SQUARES]; 6]; 2];
        for color_keys in &mut piece_keys {
            for piece_type_keys in color_keys {
                for square_key in piece_type_keys {
                    *square_key = rng.gen();
                }
            }
        }

        ZobristHash {
            piece_keys,
            side_to_move_key: rng.gen(),
        }
    }

    fn piece_key(&self, piece: &Piece, field: ChessField) -> u64 {
        let color_index = match piece.color {
            Color::White => 0,
            Color::Black => 1,
        };
        let piece_index = match piece.kind {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        };
        let square_index = field.row as usize * BOARD_SIZE as usize + field.col as usize;
        self.piece_keys[color_index][piece_index][square_index % SQUARES]
    }

    /// Toggles `piece` on `field`. Applying it twice restores the hash.
    pub fn update_piece(&self, hash: u64, piece: &Piece, field: ChessField) -> u64 {
        hash ^ self.piece_key(piece, field)
    }

    pub fn update_active_side(&self, hash: u64) -> u64 {
        hash ^ self.side_to_move_key
    }

    pub fn calculate_hash(&self, board: &Board, active_color: Color) -> u64 {
        let mut hash = board
            .pieces_with_coordinates()
            .fold(0, |hash, (field, piece)| self.update_piece(hash, piece, field));

        if active_color == Color::Black {
            hash = self.update_active_side(hash);
        }
        hash
    }
}

lazy_static! {
    pub static ref ZOBRIST: Arc<ZobristHash> = Arc::new(ZobristHash::new(42));
}

#[cfg(test)]
mod tests {
    use super::super::fen;
    use super::*;

    #[test]
    fn test_hash_depends_on_placement_and_side() {
        let start = fen::from_fen(fen::INITIAL_POSITION).unwrap();
        let moved = fen::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w - - 0 1").unwrap();

        let white = ZOBRIST.calculate_hash(&start.board, Color::White);
        assert_ne!(white, ZOBRIST.calculate_hash(&start.board, Color::Black));
        assert_ne!(white, ZOBRIST.calculate_hash(&moved.board, Color::White));
        assert_eq!(white, ZOBRIST.calculate_hash(&start.board.clone(), Color::White));
    }

    #[test]
    fn test_update_piece_is_an_involution() {
        let start = fen::from_fen(fen::INITIAL_POSITION).unwrap();
        let hash = ZOBRIST.calculate_hash(&start.board, Color::White);
        let (field, piece) = start.board.pieces_with_coordinates().next().unwrap();
        let toggled = ZOBRIST.update_piece(hash, piece, field);
        assert_ne!(hash, toggled);
        assert_eq!(hash, ZOBRIST.update_piece(toggled, piece, field));
    }
}
