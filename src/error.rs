use thiserror::Error;

use crate::chess_board::{BoardError, ChessPosition, Color, PieceId, PositionError};

/// Errors raised by the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("there is no piece on source position {0}")]
    NoPieceAtSource(ChessPosition),

    #[error("the chosen piece on {0} is not yours")]
    NotYourPiece(ChessPosition),

    #[error("there are no possible moves for the piece on {0}")]
    NoPossibleMoves(ChessPosition),

    /// `from`/`to` rather than `source`, thiserror reserves that name.
    #[error("the piece on {from} can't move to {to}")]
    IllegalTarget { from: ChessPosition, to: ChessPosition },

    #[error("you can't put yourself in check")]
    SelfCheck,

    #[error("the match is over, {winner} gave checkmate")]
    MatchOver { winner: Color },

    #[error("there is no {0} king on the board")]
    KingNotFound(Color),

    #[error("piece {0:?} is on the board but not in the list of pieces in play")]
    UnregisteredPiece(PieceId),

    #[error(transparent)]
    InvalidPosition(#[from] PositionError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

impl ChessError {
    /// The source square can't be moved from.
    pub fn is_illegal_source(&self) -> bool {
        matches!(
            self,
            ChessError::NoPieceAtSource(_) | ChessError::NotYourPiece(_) | ChessError::NoPossibleMoves(_)
        )
    }

    /// Rejections a player can fix by choosing another move.
    pub fn is_illegal_move(&self) -> bool {
        self.is_illegal_source() || matches!(self, ChessError::IllegalTarget { .. } | ChessError::SelfCheck)
    }
}
