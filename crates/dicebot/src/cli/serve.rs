//! Server command handler.

use dicebot_bot::{BotServer, DicebotConfig};
use dicebot_error::DicebotResult;
use std::path::PathBuf;

/// Load configuration from `path`, or from the standard locations.
pub fn load_config(path: Option<PathBuf>) -> DicebotResult<DicebotConfig> {
    match path {
        Some(path) => DicebotConfig::from_file(path),
        None => DicebotConfig::load(),
    }
}

/// Handle the `serve` command
pub async fn handle_serve_command(
    config_path: Option<PathBuf>,
    bind: Option<String>,
) -> DicebotResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(bind) = bind {
        config.server = config.server.with_bind(bind);
    }

    tracing::info!(bind = %config.server.bind(), "Starting dicebot server. Press Ctrl+C to stop.");

    BotServer::new(config).start().await
}
