//! Puzzle Board
//!
//! Command-line front end for the puzzle service: lists puzzles, shows a
//! puzzle's solution laid out as a text board, and registers new puzzles
//! with their pieces.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};

use puzzle_board::api::{Client, NewPuzzle};
use puzzle_board::config::{self, ClientConfig, DEFAULT_BASE_URL};
use puzzle_board::dashboard::{Dashboard, ViewState};
use puzzle_board::grid;
use puzzle_board::pieces::PieceId;
use puzzle_board::register::{register_puzzle, PieceSpec};
use puzzle_board::transport::HttpTransport;

/// Lays out jigsaw puzzle solutions fetched from the puzzle service.
#[derive(Parser)]
#[command(name = "puzzle-board")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the puzzle service.
    #[arg(long, env = "PUZZLE_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout for each request, in seconds.
    #[arg(long, env = "PUZZLE_API_TIMEOUT", default_value_t = 10)]
    timeout_secs: u64,

    /// JSON file mapping edge labels to directions.
    #[arg(long)]
    directions: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the puzzles the service knows about.
    List,
    /// Fetch a puzzle's solution and print its board.
    Show {
        name: String,
        /// Preferred start piece for the solution.
        #[arg(long)]
        start_piece: Option<PieceId>,
    },
    /// Create a puzzle and upload its pieces.
    Create {
        name: String,
        #[arg(long)]
        total_pieces: u32,
        /// Piece as ID:EDGE,EDGE,... (repeatable).
        #[arg(long = "piece")]
        pieces: Vec<PieceSpec>,
    },
    /// Print the active edge-label direction table.
    Directions,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = config::load_direction_table(cli.directions.as_deref())?;
    if let Command::Directions = cli.command {
        print!("{}", table.describe());
        return Ok(());
    }

    let config = ClientConfig::new(&cli.base_url, Duration::from_secs(cli.timeout_secs))?;
    let client = Client::new(HttpTransport::new(&config)?);

    match cli.command {
        Command::List => {
            let puzzles = client.list_puzzles().await?;
            if puzzles.is_empty() {
                println!("No puzzles");
            }
            for puzzle in puzzles {
                println!(
                    "{} ({}/{})",
                    puzzle.name, puzzle.current_pieces, puzzle.total_pieces
                );
            }
        }
        Command::Show { name, start_piece } => {
            let mut dashboard = Dashboard::new(table);
            println!("Loading solution...");
            dashboard.load(&client, &name, start_piece).await;
            match dashboard.state() {
                ViewState::Ready(board) => {
                    print!(
                        "{}",
                        grid::format_board(&board.solution, &board.layout, &board.pieces)
                    );
                    let stats = board.layout.stats;
                    if stats.conflicts > 0 {
                        eprintln!(
                            "warning: {} links disagree with the placed layout (cyclic solution)",
                            stats.conflicts
                        );
                    }
                    let shared = grid::shared_cells(&board.layout);
                    if shared > 0 {
                        eprintln!("note: {shared} cells hold pieces from different components");
                    }
                }
                ViewState::Failed(message) => {
                    eprintln!("Error: {message}");
                    std::process::exit(1);
                }
                ViewState::Idle | ViewState::Loading => {}
            }
        }
        Command::Create {
            name,
            total_pieces,
            pieces,
        } => {
            let puzzle = NewPuzzle { name, total_pieces };
            let report = register_puzzle(&client, &puzzle, &pieces).await?;
            println!(
                "Created {} with {} pieces",
                report.puzzle, report.pieces_added
            );
        }
        Command::Directions => {}
    }

    Ok(())
}

/// Installs the logger; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
