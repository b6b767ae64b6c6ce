pub mod chess_board;
pub mod chess_match;
pub mod error;
pub mod ui;

pub use chess_board::{ChessPosition, Color, Move, MoveMatrix, Piece, PieceType};
pub use chess_match::ChessMatch;
pub use error::ChessError;
