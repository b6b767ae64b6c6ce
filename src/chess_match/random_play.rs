use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::debug;

use super::ChessMatch;
use crate::chess_board::{ChessPosition, Color, Move, Piece};
use crate::error::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate(Color),
    /// The player to move has no move that keeps its king safe. No draw
    /// rules are applied, so this covers stalemate.
    NoLegalMoves,
    PlyLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            Outcome::NoLegalMoves => write!(f, "no legal moves"),
            Outcome::PlyLimit => write!(f, "ply limit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub seed: u64,
    pub plies: u32,
    pub outcome: Outcome,
    pub captured: usize,
    pub final_fen: String,
}

/// Geometric candidates of the player to move, self-check not considered.
pub fn candidate_moves(chess_match: &ChessMatch) -> Vec<Move> {
    let board = chess_match.board();
    board
        .pieces_with_coordinates()
        .filter(|(_, piece)| piece.color == chess_match.current_player())
        .flat_map(|(from, piece)| {
            piece
                .possible_moves(board, from)
                .marked_fields()
                .map(move |to| Move { from, to })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Plays one random move through [`ChessMatch::perform_move`], retrying
/// candidates refused as self-check. `None` when every candidate is refused.
pub fn random_move<R: Rng>(chess_match: &mut ChessMatch, rng: &mut R) -> Result<Option<(Move, Option<Piece>)>, ChessError> {
    let mut candidates = candidate_moves(chess_match);
    candidates.shuffle(rng);

    for mv in candidates {
        let source = ChessPosition::from_field(mv.from)?;
        let target = ChessPosition::from_field(mv.to)?;
        match chess_match.perform_move(source, target) {
            Ok(captured) => return Ok(Some((mv, captured))),
            Err(ChessError::SelfCheck) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Plays a seeded random game from the initial position.
pub fn random_game(seed: u64, max_plies: u32) -> Result<GameSummary, ChessError> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut chess_match = ChessMatch::new();
    let mut plies = 0;

    let outcome = loop {
        if let Some(winner) = chess_match.winner() {
            break Outcome::Checkmate(winner);
        }
        if plies >= max_plies {
            break Outcome::PlyLimit;
        }
        if random_move(&mut chess_match, &mut rng)?.is_none() {
            break Outcome::NoLegalMoves;
        }
        plies += 1;
    };
    debug!(seed, plies, %outcome, "random game finished");

    Ok(GameSummary {
        seed,
        plies,
        outcome,
        captured: chess_match.captured_pieces().len(),
        final_fen: chess_match.to_fen(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_board::{PieceId, ZOBRIST};

    fn assert_bookkeeping(chess_match: &ChessMatch) {
        let on_board = chess_match.pieces_on_board();
        let captured: Vec<PieceId> = chess_match.captured_pieces().iter().map(|p| p.id).collect();
        assert_eq!(on_board.len() + captured.len(), 32);
        assert!(on_board.iter().all(|id| !captured.contains(id)));
        assert!(on_board.iter().all(|id| chess_match.board().locate(*id).is_some()));
        assert_eq!(
            chess_match.position_hash(),
            ZOBRIST.calculate_hash(chess_match.board(), chess_match.current_player())
        );
    }

    /// Plays a seeded game one candidate at a time, checking the match
    /// invariants after every accepted and every refused move.
    fn checked_playout(seed: u64, max_plies: u32) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut chess_match = ChessMatch::new();

        for _ in 0..max_plies {
            if chess_match.is_checkmate() {
                assert!(chess_match.is_check());
                assert!(chess_match.legal_moves().unwrap().is_empty());
                let winner = chess_match.winner().unwrap();
                assert_eq!(winner, chess_match.current_player());
                assert_eq!(chess_match.test_check(winner.opposite()), Ok(true));
                return;
            }

            let mut candidates = candidate_moves(&chess_match);
            candidates.shuffle(&mut rng);
            let mut accepted = false;

            for mv in candidates {
                let before = chess_match.clone();
                let mover = chess_match.current_player();
                let source = ChessPosition::from_field(mv.from).unwrap();
                let target = ChessPosition::from_field(mv.to).unwrap();

                match chess_match.perform_move(source, target) {
                    Ok(captured) => {
                        assert_eq!(chess_match.test_check(mover), Ok(false));
                        assert_eq!(captured.is_some(), before.board().there_is_a_piece(mv.to).unwrap());
                        if chess_match.is_checkmate() {
                            assert_eq!(chess_match.current_turn(), before.current_turn());
                            assert_eq!(chess_match.current_player(), mover);
                        } else {
                            assert_eq!(chess_match.current_turn(), before.current_turn() + 1);
                            assert_eq!(chess_match.current_player(), mover.opposite());
                        }
                        assert_eq!(chess_match.is_check(), chess_match.test_check(mover.opposite()).unwrap());
                        accepted = true;
                    }
                    Err(ChessError::SelfCheck) => assert_eq!(chess_match, before),
                    Err(e) => panic!("unexpected error for {}: {}", mv.as_algebraic(), e),
                }
                assert_bookkeeping(&chess_match);
                if accepted {
                    break;
                }
            }

            if !accepted {
                assert!(chess_match.legal_moves().unwrap().is_empty());
                assert!(!chess_match.is_check());
                return;
            }
        }
    }

    #[test]
    fn test_random_playouts_keep_invariants() {
        for seed in 0..8 {
            checked_playout(seed, 150);
        }
    }

    #[test]
    fn test_random_game_is_reproducible() {
        let first = random_game(7, 120).unwrap();
        assert_eq!(first, random_game(7, 120).unwrap());
        assert!(first.plies <= 120);
        if first.outcome == Outcome::PlyLimit {
            assert_eq!(first.plies, 120);
        }
    }

    #[test]
    fn test_random_game_zero_plies() {
        let summary = random_game(1, 0).unwrap();
        assert_eq!(summary.plies, 0);
        assert_eq!(summary.outcome, Outcome::PlyLimit);
        assert_eq!(summary.captured, 0);
        assert_eq!(summary.final_fen, crate::chess_board::fen::INITIAL_POSITION);
    }

    #[test]
    fn test_random_move_without_legal_moves() {
        // Black to move is stalemated
        let mut chess_match = ChessMatch::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        let before = chess_match.clone();
        let mut rng = Pcg64::seed_from_u64(3);
        assert_eq!(random_move(&mut chess_match, &mut rng), Ok(None));
        assert_eq!(chess_match, before);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Checkmate(Color::Black).to_string(), "checkmate, black wins");
        assert_eq!(Outcome::NoLegalMoves.to_string(), "no legal moves");
    }
}
