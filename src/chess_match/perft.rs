use super::ChessMatch;
use crate::error::ChessError;

/// Number of leaf positions `depth` plies below `chess_match`.
pub fn perft(chess_match: &ChessMatch, depth: u8) -> Result<u64, ChessError> {
    let mut node_count = 0u64;

    if depth == 0 {
        return Ok(1u64);
    }

    for mv in chess_match.legal_moves()? {
        let mut next = chess_match.clone();
        next.perform(mv)?;
        node_count += perft(&next, depth - 1)?;
    }
    Ok(node_count)
}

/// Leaf counts below each legal move, sorted by move. Empty for depth 0,
/// where no move is played.
pub fn divide(chess_match: &ChessMatch, depth: u8) -> Result<Vec<(String, u64)>, ChessError> {
    let mut result_moves = Vec::new();
    if depth == 0 {
        return Ok(result_moves);
    }
    for mv in chess_match.legal_moves()? {
        let mut next = chess_match.clone();
        next.perform(mv)?;
        result_moves.push((mv.as_algebraic(), perft(&next, depth - 1)?));
    }
    result_moves.sort();
    Ok(result_moves)
}
