use std::thread;
use std::time::Duration;

use clap::Parser;
use minesweeper::*;
use tracing_subscriber::EnvFilter;

/// Autonomous Minesweeper bot that plays by deduction and guesses only when stuck.
#[derive(Parser, Debug)]
#[command(name = "minesweeper-bot")]
struct Cli {
    #[arg(long, default_value_t = GameConfig::default().height)]
    height: usize,

    #[arg(long, default_value_t = GameConfig::default().width)]
    width: usize,

    #[arg(long, default_value_t = GameConfig::default().mines)]
    mines: usize,

    /// Seed for mine placement and guesses.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, to make the game watchable.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Print the hidden mine layout before playing.
    #[arg(long)]
    reveal: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // --- 1. Initialization ---
    let config = GameConfig {
        height: cli.height,
        width: cli.width,
        mines: cli.mines,
        seed: cli.seed,
    };
    let mut rng = config.rng();
    let mut session = Session::new(&config, &mut rng)?;
    let delay = Duration::from_millis(cli.delay_ms);

    println!("--- Autonomous Minesweeper Bot ---");
    println!("Strategy: Play cells proven safe, guess randomly otherwise.");
    if cli.reveal {
        println!("Mine layout:");
        print!("{}", session.minefield());
    }
    print_board(&session);

    // --- 2. Game Loop ---
    while session.status() == GameStatus::Playing {
        println!("\n--- Move #{} ---", session.turns() + 1);

        match session.step(&mut rng)? {
            Turn::Revealed { mv, count } => {
                let how = if mv.is_guess() { "guesses" } else { "reveals" };
                println!("Bot {how} {} and sees {count}.", mv.cell());
            }
            Turn::Detonated(mv) => println!("Bot reveals {}... it was a mine.", mv.cell()),
            Turn::Stuck => println!("No valid moves left for the bot to make."),
        }
        print_board(&session);

        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");
    let kb = session.agent().knowledge();
    println!(
        "Moves: {}, proven safe: {}, flagged: {}, open constraints: {}",
        session.turns(),
        kb.safes().len(),
        kb.mines().len(),
        kb.constraints().len()
    );

    match session.status() {
        GameStatus::Won => println!("Result: The bot won!"),
        GameStatus::Lost => println!("Result: The bot hit a mine and lost."),
        GameStatus::Stuck | GameStatus::Playing => {
            println!("Result: The game ended unexpectedly.")
        }
    }

    Ok(())
}

fn print_board(session: &Session) {
    let width = session.minefield().dims().width;

    // Print header
    print!("   ");
    for col in 0..width {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(width));

    // Print rows
    for (row, cells) in session.view().chunks(width).enumerate() {
        print!("{:^2}|", row);
        for &value in cells {
            let display = match value {
                VIEW_HIDDEN => " ■ ".to_string(),
                VIEW_FLAGGED => " F ".to_string(),
                VIEW_DETONATED => " * ".to_string(),
                n => format!(" {} ", n),
            };
            print!("{}", display);
        }
        println!();
    }
    println!();
}
