use tracing::{debug, info, trace};

use crate::chess_board::fen::{self, FenPosition};
use crate::chess_board::{
    Board, BoardError, ChessField, ChessPosition, Color, Move, MoveMatrix, Piece, PieceId, PieceType, BOARD_SIZE,
    ZOBRIST,
};
use crate::error::ChessError;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// State of one two-player match. All mutation goes through
/// [`ChessMatch::perform_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMatch {
    board: Board,
    turn: u32,
    current_player: Color,
    check: bool,
    winner: Option<Color>,
    pieces_on_board: Vec<PieceId>,
    captured_pieces: Vec<Piece>,
    hash: u64,
}

/// What [`ChessMatch::make_move`] changed, enough to take it back.
#[derive(Debug, Clone, Copy)]
struct MoveRecord {
    from: ChessField,
    to: ChessField,
    /// Captured piece and the index it had in the on-board list.
    captured: Option<(Piece, usize)>,
}

impl Default for ChessMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessMatch {
    /// Standard starting position, white to move on turn 1.
    pub fn new() -> Self {
        let mut chess_match = Self::from_position(FenPosition {
            board: Board::new(BOARD_SIZE, BOARD_SIZE).expect("8x8 is a valid board size"),
            pieces_on_board: Vec::new(),
            active_color: Color::White,
            turn: 1,
        });
        chess_match
            .initial_setup()
            .expect("standard setup fits an empty 8x8 board");
        chess_match
    }

    /// Match starting from an arbitrary FEN position. Check and checkmate
    /// are evaluated for the side to move. A position where the other side's
    /// king is attacked can't arise from play and is rejected.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let mut chess_match = Self::from_position(fen::from_fen(fen)?);
        let to_move = chess_match.current_player;
        if chess_match.test_check(to_move.opposite())? {
            return Err(ChessError::InvalidFen(format!(
                "{} is not to move but its king is in check",
                to_move.opposite()
            )));
        }
        chess_match.check = chess_match.test_check(to_move)?;
        if chess_match.check && chess_match.test_checkmate(to_move)? {
            chess_match.winner = Some(to_move.opposite());
        }
        Ok(chess_match)
    }

    fn from_position(position: FenPosition) -> Self {
        let hash = ZOBRIST.calculate_hash(&position.board, position.active_color);
        Self {
            board: position.board,
            turn: position.turn,
            current_player: position.active_color,
            check: false,
            winner: None,
            pieces_on_board: position.pieces_on_board,
            captured_pieces: Vec::new(),
            hash,
        }
    }

    fn place_new_piece(&mut self, column: char, row: u8, color: Color, kind: PieceType) -> Result<(), ChessError> {
        let field = ChessPosition::new(column, row)?.to_field();
        let piece = Piece::new(PieceId(self.pieces_on_board.len() as u8), color, kind);
        self.board.place_piece(piece, field)?;
        self.pieces_on_board.push(piece.id);
        self.hash = ZOBRIST.update_piece(self.hash, &piece, field);
        Ok(())
    }

    fn initial_setup(&mut self) -> Result<(), ChessError> {
        for (color, pawn_rank, back_rank) in [(Color::White, 2, 1), (Color::Black, 7, 8)] {
            for (column, kind) in ('a'..='h').zip(BACK_RANK) {
                self.place_new_piece(column, pawn_rank, color, PieceType::Pawn)?;
                self.place_new_piece(column, back_rank, color, kind)?;
            }
        }
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        fen::to_fen(&self.board, self.current_player, self.turn)
    }
}

impl ChessMatch {
    pub fn current_turn(&self) -> u32 {
        self.turn
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the placement, row 0 being rank 8.
    pub fn pieces(&self) -> Vec<Vec<Option<Piece>>> {
        self.board.to_rows()
    }

    pub fn pieces_on_board(&self) -> &[PieceId] {
        &self.pieces_on_board
    }

    pub fn captured_pieces(&self) -> &[Piece] {
        &self.captured_pieces
    }

    pub fn position_hash(&self) -> u64 {
        self.hash
    }

    /// Legality matrix of the piece on `source`. Geometry and occupancy
    /// only: a marked target may still be refused as a self-check.
    pub fn possible_moves(&self, source: ChessPosition) -> Result<MoveMatrix, ChessError> {
        let field = source.to_field();
        let piece = self.validate_source_position(field)?;
        Ok(piece.possible_moves(&self.board, field))
    }

    /// Every move of the player to move that does not leave its own king
    /// attacked. Empty once the match is decided.
    pub fn legal_moves(&self) -> Result<Vec<Move>, ChessError> {
        if self.is_checkmate() {
            return Ok(Vec::new());
        }
        let mut scratch = self.clone();
        let mut legal_moves = Vec::new();
        for (from, piece) in self.pieces_of(self.current_player) {
            for to in piece.possible_moves(&self.board, from).marked_fields() {
                if !scratch.simulate(from, to, |m| m.test_check(piece.color))? {
                    legal_moves.push(Move { from, to });
                }
            }
        }
        Ok(legal_moves)
    }

    pub fn perform(&mut self, mv: Move) -> Result<Option<Piece>, ChessError> {
        self.perform_move(ChessPosition::from_field(mv.from)?, ChessPosition::from_field(mv.to)?)
    }

    /// Validates and plays `source -> target` for the player to move.
    ///
    /// Returns the captured piece, if any. On error the match is left
    /// exactly as it was before the call.
    pub fn perform_move(&mut self, source: ChessPosition, target: ChessPosition) -> Result<Option<Piece>, ChessError> {
        if let Some(winner) = self.winner {
            return Err(ChessError::MatchOver { winner });
        }
        let from = source.to_field();
        let to = target.to_field();
        let piece = self.validate_source_position(from)?;
        self.validate_target_position(&piece, from, to)?;

        let mover = self.current_player;
        let record = self.make_move(from, to)?;
        match self.test_check(mover) {
            Ok(false) => {}
            Ok(true) => {
                self.undo_move(record)?;
                debug!(turn = self.turn, %source, %target, "move rolled back, it exposes the own king");
                return Err(ChessError::SelfCheck);
            }
            Err(e) => {
                self.undo_move(record)?;
                return Err(e);
            }
        }

        let opponent = mover.opposite();
        let verdict = self
            .test_check(opponent)
            .and_then(|check| Ok((check, check && self.test_checkmate(opponent)?)));
        let (check, checkmate) = match verdict {
            Ok(verdict) => verdict,
            Err(e) => {
                self.undo_move(record)?;
                return Err(e);
            }
        };
        self.check = check;
        debug!(turn = self.turn, player = %mover, %source, %target, check, "move performed");

        if checkmate {
            info!(turn = self.turn, winner = %mover, "checkmate");
            self.winner = Some(mover);
        } else {
            if self.check {
                info!(turn = self.turn, player = %opponent, "check");
            }
            self.next_turn();
        }

        Ok(record.captured.map(|(captured, _)| captured))
    }

    fn next_turn(&mut self) {
        self.turn = self.turn.saturating_add(1);
        self.current_player = self.current_player.opposite();
        self.hash = ZOBRIST.update_active_side(self.hash);
    }

    fn validate_source_position(&self, field: ChessField) -> Result<Piece, ChessError> {
        let position = ChessPosition::from_field(field)?;
        let piece = *self
            .board
            .piece(field)?
            .ok_or(ChessError::NoPieceAtSource(position))?;
        if piece.color != self.current_player {
            return Err(ChessError::NotYourPiece(position));
        }
        if !piece.is_there_any_possible_move(&self.board, field) {
            return Err(ChessError::NoPossibleMoves(position));
        }
        Ok(piece)
    }

    fn validate_target_position(&self, piece: &Piece, from: ChessField, to: ChessField) -> Result<(), ChessError> {
        if !piece.possible_move(&self.board, from, to) {
            return Err(ChessError::IllegalTarget {
                from: ChessPosition::from_field(from)?,
                to: ChessPosition::from_field(to)?,
            });
        }
        Ok(())
    }

    /// Executes `from -> to` without any legality check. Paired with
    /// [`ChessMatch::undo_move`], which reverses it exactly.
    fn make_move(&mut self, from: ChessField, to: ChessField) -> Result<MoveRecord, ChessError> {
        for field in [from, to] {
            if !self.board.position_exists(field) {
                return Err(BoardError::OutOfBounds(field).into());
            }
        }
        if !self.board.there_is_a_piece(from)? {
            return Err(BoardError::NoPiece(from).into());
        }
        let captured_index = match self.board.piece(to)? {
            Some(target) => Some(
                self.pieces_on_board
                    .iter()
                    .position(|id| *id == target.id)
                    .ok_or(ChessError::UnregisteredPiece(target.id))?,
            ),
            None => None,
        };

        let mut piece = self.board.take_piece(from)?;
        self.hash = ZOBRIST.update_piece(self.hash, &piece, from);
        piece.increase_move_count();

        let captured = match captured_index {
            Some(index) => {
                let captured = self.board.take_piece(to)?;
                self.hash = ZOBRIST.update_piece(self.hash, &captured, to);
                self.pieces_on_board.remove(index);
                self.captured_pieces.push(captured);
                Some((captured, index))
            }
            None => None,
        };

        self.board.place_piece(piece, to)?;
        self.hash = ZOBRIST.update_piece(self.hash, &piece, to);

        Ok(MoveRecord { from, to, captured })
    }

    fn undo_move(&mut self, record: MoveRecord) -> Result<(), ChessError> {
        let mut piece = self.board.take_piece(record.to)?;
        self.hash = ZOBRIST.update_piece(self.hash, &piece, record.to);
        piece.decrease_move_count();
        self.board.place_piece(piece, record.from)?;
        self.hash = ZOBRIST.update_piece(self.hash, &piece, record.from);

        if let Some((captured, index)) = record.captured {
            self.board.place_piece(captured, record.to)?;
            self.hash = ZOBRIST.update_piece(self.hash, &captured, record.to);
            if let Some(i) = self.captured_pieces.iter().rposition(|p| p.id == captured.id) {
                self.captured_pieces.remove(i);
            }
            self.pieces_on_board.insert(index.min(self.pieces_on_board.len()), captured.id);
        }
        Ok(())
    }

    /// Plays `from -> to`, evaluates the resulting position and takes the
    /// move back.
    fn simulate<T>(
        &mut self,
        from: ChessField,
        to: ChessField,
        evaluate: impl FnOnce(&Self) -> Result<T, ChessError>,
    ) -> Result<T, ChessError> {
        let record = self.make_move(from, to)?;
        trace!(from = %from.as_algebraic(), to = %to.as_algebraic(), "simulating move");
        let result = evaluate(self);
        self.undo_move(record)?;
        result
    }

    /// On-board pieces of `color`, in registration order.
    fn pieces_of(&self, color: Color) -> Vec<(ChessField, Piece)> {
        self.pieces_on_board
            .iter()
            .filter_map(|id| {
                let field = self.board.locate(*id)?;
                let piece = *self.board.piece(field).ok()??;
                Some((field, piece))
            })
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    fn king_field(&self, color: Color) -> Result<ChessField, ChessError> {
        self.pieces_of(color)
            .into_iter()
            .find(|(_, piece)| piece.kind == PieceType::King)
            .map(|(field, _)| field)
            .ok_or(ChessError::KingNotFound(color))
    }

    /// Whether any opposing piece attacks the king of `color`.
    pub fn test_check(&self, color: Color) -> Result<bool, ChessError> {
        let king_field = self.king_field(color)?;
        Ok(self
            .pieces_of(color.opposite())
            .iter()
            .any(|(field, piece)| piece.possible_moves(&self.board, *field).is_marked(king_field)))
    }

    /// Whether `color` is in check and every move of every piece of `color`
    /// leaves it in check. Each candidate is played and taken back, the
    /// match is unchanged afterwards.
    pub fn test_checkmate(&mut self, color: Color) -> Result<bool, ChessError> {
        if !self.test_check(color)? {
            return Ok(false);
        }
        for (from, piece) in self.pieces_of(color) {
            let moves = piece.possible_moves(&self.board, from);
            for to in moves.marked_fields() {
                if !self.simulate(from, to, |m| m.test_check(color))? {
                    trace!(
                        from = %from.as_algebraic(),
                        to = %to.as_algebraic(),
                        "check can be escaped"
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
