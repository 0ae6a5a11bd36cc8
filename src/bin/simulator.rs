use anyhow::{bail, Context, Result};
use clap::Parser;
use match3_engine::config::{GameConfig, SimulationConfig};
use match3_engine::game::Game;
use match3_engine::sampler::MoveStrategy;
use match3_engine::simulation::{run_simulation, SimulationStatus};
use match3_engine::utils::grid_from_str_array;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Simulate unattended match-three play", long_about = None)]
struct Args {
    #[clap(long, default_value_t = 8)]
    rows: usize,

    #[clap(long, default_value_t = 8)]
    columns: usize,

    #[clap(long, default_value_t = 5)]
    colors: u8,

    /// Number of moves to play
    #[clap(short, long, default_value_t = 100)]
    moves: usize,

    /// Also play random moves that produce no match
    #[clap(long)]
    unconstrained: bool,

    /// Seed for a reproducible run
    #[clap(long)]
    seed: Option<u64>,

    /// Start from a board file (top row first, base-36 ids) instead of a random board
    #[clap(long)]
    board: Option<PathBuf>,
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter_layer)
        .with_target(false)
        .init();
}

fn read_board_file(path: &PathBuf, colors: u8, seed: Option<u64>) -> Result<Game> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let grid = match grid_from_str_array(&lines) {
        Ok(grid) => grid,
        Err(message) => bail!("invalid board format: {}", message),
    };
    Game::from_grid(grid, colors, seed).context("board does not fit the color count")
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let game = match &args.board {
        Some(path) => read_board_file(path, args.colors, args.seed)?,
        None => {
            let mut config = GameConfig::new(args.rows, args.columns, args.colors);
            config.seed = args.seed;
            Game::new(&config).context("failed to set up the board")?
        }
    };
    println!("Initial board state:\n{}\n", game.grid());

    let config = SimulationConfig::new(args.moves, MoveStrategy::from_only_matching(!args.unconstrained));
    let (game, outcome) = run_simulation(
        game,
        config,
        |done, total| {
            if done == total || done % 10 == 0 {
                info!("progress {}/{}", done, total);
            }
        },
        |_| {},
        |status| match status {
            SimulationStatus::Success => println!("Simulation success"),
            SimulationStatus::Exhausted => println!("Simulation ran out of moves"),
            SimulationStatus::Cancelled => println!("Simulation cancelled"),
        },
    )?;

    println!("Moves played: {}/{}", outcome.moves_done, outcome.total_moves);
    println!("Final score: {}\n", outcome.score);
    println!("Final board state:\n{}\n", game.grid());

    outcome.into_result()?;
    Ok(())
}
