use std::error::Error;
use std::io::{stdin, stdout};
use std::time::Instant;

use chess_match::chess_board::fen::INITIAL_POSITION;
use chess_match::chess_match::perft::divide;
use chess_match::chess_match::random_game;
use chess_match::ui::{render_board, run_console_game};
use chess_match::{ChessMatch, ChessPosition, Move};

use clap::arg;
use clap::command;
use clap::Command;

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let fen_arg = || {
        arg!(
        -f --fen <FEN> "Board position"
                )
        .default_value(INITIAL_POSITION)
    };

    let matches = command!()
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(Command::new("play").about("Play a match on the console"))
        .subcommand(
            Command::new("moves")
                .about("Show the possible moves of a piece")
                .arg(arg!(<square> "Square of the piece, e.g. e2"))
                .arg(fen_arg()),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a list of moves")
                .arg(fen_arg())
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .required(true)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(fen_arg())
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8).range(1..)),
                ),
        )
        .subcommand(
            Command::new("random")
                .about("Play seeded random games")
                .arg(
                    arg!(
                    -s --seed <seed> "Seed of the first game"
                            )
                    .default_value("42")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -g --games <games> "Number of games"
                            )
                    .default_value("10")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -p --plies <plies> "Maximum plies per game"
                            )
                    .default_value("200")
                    .value_parser(clap::value_parser!(u32)),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("debug") { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match matches.subcommand() {
        Some(("moves", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map_or(INITIAL_POSITION, String::as_str);
            let square = arg_matches.get_one::<String>("square").map_or("", String::as_str);
            show_moves(fen, square)?;
        }
        Some(("replay", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map_or(INITIAL_POSITION, String::as_str);
            let moves = arg_matches
                .get_many::<String>("moves")
                .unwrap_or_default()
                .filter(|&v| !v.is_empty())
                .collect::<Vec<_>>();
            replay(fen, moves)?;
        }
        Some(("perft", arg_matches)) => {
            let fen = arg_matches.get_one::<String>("fen").map_or(INITIAL_POSITION, String::as_str);
            let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
            perft(fen, depth)?;
        }
        Some(("random", arg_matches)) => {
            let seed = arg_matches.get_one::<u64>("seed").copied().unwrap_or(42);
            let games = arg_matches.get_one::<u64>("games").copied().unwrap_or(10);
            let plies = arg_matches.get_one::<u32>("plies").copied().unwrap_or(200);
            random_games(seed, games, plies)?;
        }
        Some(("play", _)) | None => {
            run_console_game(stdin().lock(), stdout())?;
        }
        _ => unreachable!("Exhausted list of subcommands"),
    }
    Ok(())
}

fn show_moves(fen: &str, square: &str) -> Result<(), Box<dyn Error>> {
    let chess_match = ChessMatch::from_fen(fen)?;
    let source: ChessPosition = square.parse()?;
    let matrix = chess_match.possible_moves(source)?;
    print!("{}", render_board(&chess_match, Some(&matrix)));
    let targets: Vec<String> = matrix.marked_fields().map(|f| f.as_algebraic()).collect();
    println!("{}: {}", source, targets.join(" "));
    Ok(())
}

#[derive(Tabled)]
struct ReplayRow {
    turn: u32,
    player: String,
    mv: String,
    captured: String,
    check: bool,
    result: String,
}

fn replay(fen: &str, moves: Vec<&String>) -> Result<(), Box<dyn Error>> {
    let mut chess_match = ChessMatch::from_fen(fen)?;
    let mut table_rows = Vec::new();

    for m in moves {
        let turn = chess_match.current_turn();
        let player = chess_match.current_player().to_string();
        let outcome = Move::from_algebraic(m)
            .map_err(Into::into)
            .and_then(|mv| chess_match.perform(mv));
        let (captured, result) = match outcome {
            Ok(captured) => (captured.map(|p| p.to_string()).unwrap_or_default(), "ok".to_string()),
            Err(e) => {
                warn!(mv = %m, error = %e, "move rejected");
                (String::new(), e.to_string())
            }
        };
        table_rows.push(ReplayRow {
            turn,
            player,
            mv: m.clone(),
            captured,
            check: chess_match.is_check(),
            result,
        });
    }

    println!("{}", Table::new(table_rows).with(Style::modern()));
    print!("{}", render_board(&chess_match, None));
    match chess_match.winner() {
        Some(winner) => println!("Checkmate, {} wins", winner),
        None => println!("{}", chess_match.to_fen()),
    }
    Ok(())
}

fn perft(fen: &str, depth: u8) -> Result<(), Box<dyn Error>> {
    println!("Perft test for {} with depth {}", fen, depth);
    let chess_match = ChessMatch::from_fen(fen)?;
    let start_time = Instant::now();

    let mut num_nodes = 0;
    for (m, c) in divide(&chess_match, depth)? {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
    info!(nodes = num_nodes, elapsed = ?start_time.elapsed(), "perft finished");
    Ok(())
}

#[derive(Tabled)]
struct RandomGameRow {
    seed: u64,
    plies: u32,
    outcome: String,
    captured: usize,
    final_position: String,
}

fn random_games(seed: u64, games: u64, max_plies: u32) -> Result<(), Box<dyn Error>> {
    let mut table_rows = Vec::new();
    for seed in seed..seed.saturating_add(games) {
        let summary = random_game(seed, max_plies)?;
        table_rows.push(RandomGameRow {
            seed: summary.seed,
            plies: summary.plies,
            outcome: summary.outcome.to_string(),
            captured: summary.captured,
            final_position: summary.final_fen,
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}
