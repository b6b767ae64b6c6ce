mod chess_match;
pub mod perft;
pub mod random_play;

pub use chess_match::ChessMatch;
pub use perft::perft;
pub use random_play::{random_game, GameSummary, Outcome};
