use super::{Board, ChessField, Color, MoveMatrix, Piece, PieceType};

const KNIGHT_MOVES: [(isize, isize); 8] = [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
const KING_MOVES: [(isize, isize); 8] = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const QUEEN_DIRECTIONS: [(isize, isize); 8] = [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];

impl Piece {
    /// Legality matrix of this piece standing on `at`.
    pub fn possible_moves(&self, board: &Board, at: ChessField) -> MoveMatrix {
        match self.kind {
            PieceType::Pawn => self.pawn_moves(board, at),
            PieceType::Knight => self.moves_from_directions(board, at, &KNIGHT_MOVES),
            PieceType::Bishop => self.sliding_moves(board, at, &BISHOP_DIRECTIONS),
            PieceType::Rook => self.sliding_moves(board, at, &ROOK_DIRECTIONS),
            PieceType::Queen => self.sliding_moves(board, at, &QUEEN_DIRECTIONS),
            PieceType::King => self.moves_from_directions(board, at, &KING_MOVES),
        }
    }

    pub fn possible_move(&self, board: &Board, at: ChessField, target: ChessField) -> bool {
        self.possible_moves(board, at).is_marked(target)
    }

    pub fn is_there_any_possible_move(&self, board: &Board, at: ChessField) -> bool {
        self.possible_moves(board, at).any()
    }

    fn is_opponent_piece(&self, board: &Board, field: ChessField) -> bool {
        matches!(board.piece(field), Ok(Some(p)) if p.color != self.color)
    }

    fn is_free(board: &Board, field: ChessField) -> bool {
        matches!(board.piece(field), Ok(None))
    }

    fn pawn_moves(&self, board: &Board, at: ChessField) -> MoveMatrix {
        let mut moves = MoveMatrix::for_board(board);
        let forward = match self.color {
            Color::White => -1,
            Color::Black => 1,
        };

        // Regular forward move
        if let Some(one) = at.offset(forward, 0).filter(|f| Self::is_free(board, *f)) {
            moves.mark(one);

            // Double move on the pawn's first move
            if self.move_count == 0 {
                if let Some(two) = at.offset(2 * forward, 0).filter(|f| Self::is_free(board, *f)) {
                    moves.mark(two);
                }
            }
        }

        // Capture diagonally
        for dc in [-1, 1] {
            if let Some(target) = at.offset(forward, dc) {
                if self.is_opponent_piece(board, target) {
                    moves.mark(target);
                }
            }
        }

        moves
    }

    /// Bishop, rook and queen rays, stopped by the first occupied field.
    fn sliding_moves(&self, board: &Board, at: ChessField, directions: &[(isize, isize)]) -> MoveMatrix {
        let mut moves = MoveMatrix::for_board(board);

        for &(dr, dc) in directions {
            let mut current = at;
            while let Some(next) = current.offset(dr, dc).filter(|f| board.position_exists(*f)) {
                if Self::is_free(board, next) {
                    moves.mark(next);
                    current = next;
                    continue;
                }
                if self.is_opponent_piece(board, next) {
                    moves.mark(next);
                }
                break; // Block sliding
            }
        }

        moves
    }

    fn moves_from_directions(&self, board: &Board, at: ChessField, directions: &[(isize, isize)]) -> MoveMatrix {
        let mut moves = MoveMatrix::for_board(board);

        for &(dr, dc) in directions {
            if let Some(target) = at.offset(dr, dc).filter(|f| board.position_exists(*f)) {
                if Self::is_free(board, target) || self.is_opponent_piece(board, target) {
                    moves.mark(target);
                }
            }
        }
        moves
    }
}
