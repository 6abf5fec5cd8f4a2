//! Roll command handler.

use super::serve::load_config;
use dicebot_dice::Evaluator;
use dicebot_error::DicebotResult;
use std::path::PathBuf;
use std::time::Instant;

/// Handle the `roll` command.
///
/// Returns `None` when the descriptor is not a roll at all.
pub fn handle_roll_command(
    descriptor: &str,
    config_path: Option<PathBuf>,
) -> DicebotResult<Option<String>> {
    let config = load_config(config_path)?;
    let evaluator = Evaluator::new(&config.dice);

    let start = Instant::now();
    let result = evaluator.evaluate(descriptor.trim());
    tracing::debug!(descriptor, elapsed_ms = start.elapsed().as_millis() as u64, "Rolling cost");

    match result {
        Ok(summary) => Ok(Some(summary)),
        Err(e) if e.is_ignorable() => {
            tracing::info!(descriptor, "Not a dice descriptor, nothing to roll");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
