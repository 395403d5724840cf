//! Sumito CLI - Command-line interface
//!
//! Commands:
//! - play: interactive game in the terminal (vs AI or hotseat)
//! - match: AI-vs-AI series between two difficulties
//! - serve: start the multiplayer relay

mod match_cmd;
mod play;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sumito")]
#[command(about = "Sumito hexagonal push-capture board game")]
struct Cli {
    /// RNG seed for reproducible AI behavior
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game in the terminal
    Play(play::PlayArgs),
    /// Play an AI-vs-AI series
    Match(match_cmd::MatchArgs),
    /// Start the multiplayer relay server
    Serve {
        #[arg(long, default_value = "8002")]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Serve { port } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(sumito_server::run_server(sumito_server::ServerConfig {
                port,
            }))
        }
    }
}
