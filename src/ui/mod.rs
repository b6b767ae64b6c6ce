use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::chess_board::{ChessField, ChessPosition, Color, Move, MoveMatrix, Piece, BOARD_SIZE};
use crate::chess_match::ChessMatch;
use crate::error::ChessError;

const FILES: &str = "    a   b   c   d   e   f   g   h\n";

fn square_char(piece: Option<&Piece>, marked: bool) -> char {
    match (piece, marked) {
        (Some(_), true) => 'x',
        (None, true) => '·',
        (Some(piece), false) => piece.to_char(),
        (None, false) => ' ',
    }
}

/// Renders the board as a box drawing grid, rank 8 on top. Fields marked in
/// `highlight` show `·` when empty and `x` when they hold a capturable piece.
pub fn render_board(chess_match: &ChessMatch, highlight: Option<&MoveMatrix>) -> String {
    let board = chess_match.board();
    let mut board_representation = String::new();
    board_representation.push_str(FILES);
    board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

    for row in 0..BOARD_SIZE {
        let rank = BOARD_SIZE - row;
        board_representation.push_str(&format!("{} │", rank));
        for col in 0..BOARD_SIZE {
            let field = ChessField::new(row, col);
            let piece = board.piece(field).ok().flatten();
            let marked = highlight.is_some_and(|matrix| matrix.is_marked(field));
            board_representation.push_str(&format!(" {} │", square_char(piece, marked)));
        }
        board_representation.push_str(&format!(" {}\n", rank));

        if row + 1 < BOARD_SIZE {
            board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
        }
    }

    board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
    board_representation.push_str(FILES);
    board_representation
}

fn captured_by(chess_match: &ChessMatch, color: Color) -> String {
    chess_match
        .captured_pieces()
        .iter()
        .filter(|piece| piece.color == color)
        .map(|piece| piece.to_char().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_status<W: Write>(chess_match: &ChessMatch, output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "Captured pieces: white [{}] black [{}]",
        captured_by(chess_match, Color::White),
        captured_by(chess_match, Color::Black)
    )?;
    match chess_match.winner() {
        Some(winner) => writeln!(output, "CHECKMATE! Winner: {}", winner)?,
        None => {
            writeln!(output, "Turn: {}", chess_match.current_turn())?;
            writeln!(output, "Waiting player: {}", chess_match.current_player())?;
            if chess_match.is_check() {
                writeln!(output, "CHECK!")?;
            }
        }
    }
    Ok(())
}

enum Command {
    Quit,
    Show(ChessPosition),
    Play(Move),
}

fn parse_command(line: &str) -> Result<Command, ChessError> {
    if line.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }
    if line.split_whitespace().count() == 1 && line.len() == 2 {
        return Ok(Command::Show(line.parse()?));
    }
    Ok(Command::Play(Move::from_algebraic(line)?))
}

fn report<W: Write>(output: &mut W, line: &str, e: ChessError) -> io::Result<()> {
    warn!(input = %line, error = %e, "rejected input");
    writeln!(output, "Error: {}", e)
}

/// Interactive match on a line based console.
///
/// Accepts `e2` to show the possible moves of a piece, `e2 e4` or `e2e4`
/// to play a move and `quit`. Ends at checkmate or end of input and
/// returns the final match. Read errors end the game with that error.
pub fn run_console_game<R: BufRead, W: Write>(input: R, mut output: W) -> io::Result<ChessMatch> {
    let mut chess_match = ChessMatch::new();
    write!(output, "{}", render_board(&chess_match, None))?;
    write_status(&chess_match, &mut output)?;

    for line in input.lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "failed to read input");
                return Err(e);
            }
        };

        if line.is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                report(&mut output, &line, e)?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Show(source) => match chess_match.possible_moves(source) {
                Ok(matrix) => write!(output, "{}", render_board(&chess_match, Some(&matrix)))?,
                Err(e) => report(&mut output, &line, e)?,
            },
            Command::Play(mv) => match chess_match.perform(mv) {
                Ok(captured) => {
                    if let Some(piece) = captured {
                        writeln!(output, "Captured {} on {}", piece, mv.to.as_algebraic())?;
                    }
                    write!(output, "{}", render_board(&chess_match, None))?;
                    write_status(&chess_match, &mut output)?;
                    if chess_match.is_checkmate() {
                        break;
                    }
                }
                Err(e) => report(&mut output, &line, e)?,
            },
        }
    }

    Ok(chess_match)
}
