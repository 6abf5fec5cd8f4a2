//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the dicebot binary.

mod commands;
mod roll;
mod serve;

pub use commands::{Cli, Commands};
pub use roll::handle_roll_command;
pub use serve::{handle_serve_command, load_config};
