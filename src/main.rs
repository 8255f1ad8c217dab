use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shenzhen_solitaire::display;
use shenzhen_solitaire::game::Game;
use shenzhen_solitaire::seed::Seed;
use shenzhen_solitaire::session::GameSession;

/// Shenzhen Solitaire in your terminal.
#[derive(Debug, Parser)]
#[command(name = "shenzhen-solitaire", version)]
struct Cli {
    /// Replay the deal with this code
    #[arg(long)]
    seed: Option<Seed>,

    /// Where wins and the best time are kept
    #[arg(long, default_value = "shenzhen.stats")]
    stats: PathBuf,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the deal and exit
    #[arg(long)]
    show: bool,
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        if let Err(err) = init_logging(path) {
            eprintln!("could not open log file {}: {}", path.display(), err);
            process::exit(2);
        }
    }

    let session = GameSession::new(cli.seed);
    if cli.show {
        println!("Deal {}", session.seed());
        print!("{}", display::display_board(session.board()));
        return;
    }
    Game::new(session, cli.stats).play();
}
