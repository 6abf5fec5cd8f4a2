//! Dicebot CLI binary.
//!
//! - `serve` runs the callback server
//! - `roll` evaluates a single descriptor locally

use clap::Parser;
use dicebot::cli::{Cli, Commands, handle_roll_command, handle_serve_command};
use dicebot::{ObservabilityConfig, init_observability_with_config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability_with_config(
        ObservabilityConfig::new("dicebot")
            .with_log_level(log_level)
            .with_json_logs(cli.json),
    )?;

    match cli.command {
        Commands::Serve { config, bind } => {
            handle_serve_command(config, bind).await?;
        }

        Commands::Roll { descriptor, config } => {
            if let Some(summary) = handle_roll_command(&descriptor, config)? {
                println!("{}", summary);
            }
        }
    }

    Ok(())
}
