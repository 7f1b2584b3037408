mod commands;
mod config;
mod display;
mod prompt;

use clap::{Parser, Subcommand};
use diceduel_core::{DuelError, DEFAULT_PORT};
use diceduel_game::GameError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diceduel")]
#[command(about = "Dice Duel over LAN - two-player dice wagering")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Starting balance for the local player
    #[arg(short, long, global = true)]
    balance: Option<i64>,

    /// Seed for the host's dice
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Give up on a silent peer after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Accept the peer's numbers without range checks
    #[arg(long, global = true)]
    trust_peer: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for a player to join and roll the die each round
    Host {
        /// Display name (prompted if omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Join a hosted game
    Join {
        /// Host address, with or without port
        address: String,
        /// Display name (prompted if omitted)
        #[arg(short, long)]
        name: Option<String>,
        /// Port used when the address has none
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "diceduel={},diceduel_core={},diceduel_game={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = match &cli.command {
        Commands::Host { port, .. } | Commands::Join { port, .. } => *port,
    };
    let overrides = config::Overrides {
        port,
        balance: cli.balance,
        seed: cli.seed,
        timeout_secs: cli.timeout_secs,
        trust_peer: cli.trust_peer,
    };
    let game_config = config::load(cli.config.as_deref(), &overrides)?;

    let result = match cli.command {
        Commands::Host { name, .. } => commands::handle_host(&game_config, name).await,
        Commands::Join { address, name, .. } => {
            commands::handle_join(&game_config, &address, name).await
        }
    };

    if let Err(e) = result {
        match e {
            GameError::Core(DuelError::Transport(msg)) => {
                eprintln!("Error: Connection failed: {}", msg);
                if game_config.port == DEFAULT_PORT {
                    eprintln!("Check that the host is running and port {} is reachable", DEFAULT_PORT);
                }
            }
            GameError::Core(DuelError::Timeout(msg)) => {
                eprintln!("Error: Opponent stopped responding: {}", msg);
            }
            GameError::Dialog(msg) => {
                eprintln!("Error: Could not read input: {}", msg);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
