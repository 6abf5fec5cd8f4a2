//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dicebot - dice rolling chat bot backend
#[derive(Parser, Debug)]
#[command(name = "dicebot")]
#[command(about = "Dice rolling chat bot backend with duplicate event suppression", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the event callback server
    Serve {
        /// Path to a dicebot.toml file (defaults to the standard locations)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the listen address, e.g. 127.0.0.1:9726
        #[arg(long)]
        bind: Option<String>,
    },

    /// Roll a dice descriptor and print the summary
    Roll {
        /// Descriptor such as 3d6 or d20
        descriptor: String,

        /// Path to a dicebot.toml file (defaults to the standard locations)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
