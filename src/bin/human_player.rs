use anyhow::{Context, Result};
use clap::Parser;
use match3_engine::config::GameConfig;
use match3_engine::engine::{Cell, Direction};
use match3_engine::error::EngineError;
use match3_engine::game::Game;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play match-three swaps from the command line", long_about = None)]
struct Args {
    #[clap(long, default_value_t = 8)]
    rows: usize,

    #[clap(long, default_value_t = 8)]
    columns: usize,

    #[clap(long, default_value_t = 5)]
    colors: u8,

    /// Seed for a reproducible board
    #[clap(long)]
    seed: Option<u64>,
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter_layer)
        .with_target(false)
        .init();
}

fn parse_move(input: &str) -> Option<(Cell, Direction)> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }
    let row = parts[0].parse::<usize>().ok()?;
    let column = parts[1].parse::<usize>().ok()?;
    let direction = parts[2].parse::<Direction>().ok()?;
    Some((Cell::new(row, column), direction))
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = GameConfig::new(args.rows, args.columns, args.colors);
    config.seed = args.seed;
    let mut game = Game::new(&config).context("failed to set up the board")?;
    println!("Welcome to Match Three! Row 0 is the bottom row.");

    loop {
        println!("---------------------");
        println!("Score: {}", game.score());
        println!("{}", game.grid());

        if !game.has_matching_move() {
            println!();
            println!("---------------------");
            println!("No moves left. Final Score: {}", game.score());
            println!("---------------------");
            break;
        }

        print!("Enter your move (row col up|down|left|right), 'a' to auto-play, 'q' to quit: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).context("failed to read input")? == 0 {
            break;
        }
        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "a" {
            match game.auto_play_step()? {
                Some((mv, report)) => println!(
                    "Auto-play moved {} and destroyed {} tiles in {} passes.",
                    mv,
                    report.destroyed,
                    report.passes() - 1
                ),
                None => println!("No more moves."),
            }
            continue;
        }

        let Some((cell, direction)) = parse_move(trimmed_input) else {
            println!("Invalid input format. Use 'row col direction', 'a', or 'q'.");
            continue;
        };

        match game.request_swap(cell, direction) {
            Ok(report) => println!(
                "Move processed: {} tiles destroyed, {} cells changed.",
                report.destroyed,
                report.changed_cells().len()
            ),
            Err(error @ (EngineError::OutOfBounds { .. } | EngineError::NoMatchProduced { .. })) => {
                println!("Invalid move: {}.", error)
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}
