use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use boardside::engines::engine_fallback::FallbackEngine;
use boardside::engines::engine_trait::Engine;
use boardside::engines::strength::{Strength, DEFAULT_RATING};
use boardside::game::controller::{ControllerSettings, GameController, GameStatus, SelectionOutcome};
use boardside::game_state::chess_types::Color;
use boardside::game_state::game_state::GameState;
use boardside::uci::uci_adapter::ExternalEngineAdapter;
use boardside::utils::fen_parser::parse_fen;
use boardside::utils::long_algebraic::{move_to_long_algebraic, parse_long_algebraic};
use boardside::utils::render_game_state::render_game_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ComputerSide {
    White,
    Black,
    None,
}

#[derive(Parser, Debug)]
#[command(name = "boardside")]
#[command(about = "Play chess in the terminal against a UCI engine or the built-in search", long_about = None)]
struct Args {
    /// Computer rating; drives search depth, time and engine strength options
    #[arg(short, long, default_value_t = DEFAULT_RATING)]
    rating: u32,

    /// Path to an external UCI engine executable
    #[arg(short, long)]
    engine: Option<PathBuf>,

    /// Side played by the computer
    #[arg(short, long, value_enum, default_value_t = ComputerSide::Black)]
    computer: ComputerSide,

    /// Starting position
    #[arg(short, long)]
    fen: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let start = match &args.fen {
        Some(fen) => parse_fen(fen)?,
        None => GameState::new_game(),
    };

    let strength = Strength::new(args.rating);
    let settings = ControllerSettings {
        vs_computer: args.computer != ComputerSide::None,
        computer_color: match args.computer {
            ComputerSide::White => Color::Light,
            _ => Color::Dark,
        },
        strength,
    };
    let mut game = GameController::from_state(settings, start);
    let mut adapter = match &args.engine {
        Some(path) => ExternalEngineAdapter::spawn(strength, path.clone()),
        None => ExternalEngineAdapter::disabled(strength),
    };
    let mut fallback = FallbackEngine::new(strength);
    info!(rating = strength.rating, computer = ?args.computer, "boardside started");

    println!("{}", render_game_state(game.state(), None));
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if game.status().is_game_over() {
            println!("{}", game.status_text());
            break;
        }

        if game.is_computer_turn() {
            println!("{}", GameStatus::ComputerThinking.status_text());
            let chosen = game.play_computer_move(&mut adapter, &mut fallback)?;
            if game.status() == GameStatus::EngineUnavailable {
                println!("{}", game.status_text());
            }
            println!("computer plays {}", move_to_long_algebraic(chosen.mv));
            println!("{}", render_game_state(game.state(), game.last_move()));
            continue;
        }

        print!("{} ({} to move)> ", game.status_text(), game.side_to_move().name());
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "fen" => println!("{}", game.state().get_fen()),
            "new" => {
                game.reset();
                adapter.new_game();
                fallback.new_game();
                println!("{}", render_game_state(game.state(), None));
            }
            text => {
                let parsed = match parse_long_algebraic(text) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match game.submit_move(parsed.from, parsed.to) {
                    Ok(SelectionOutcome::Moved(_)) => {
                        println!("{}", render_game_state(game.state(), game.last_move()))
                    }
                    Ok(_) => println!("{text} is not a legal move"),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(())
}
