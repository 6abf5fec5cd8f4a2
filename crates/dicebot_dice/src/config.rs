//! Dice evaluation settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for dice evaluation and roll commands.
///
/// ```toml
/// [dice]
/// max_listing_chars = 10000
/// default_notation = "1d100"
/// roll_timeout_ms = 5000
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct DiceConfig {
    /// Maximum length of the rendered roll listing, marker included
    #[serde(default = "default_max_listing_chars")]
    #[builder(default = "default_max_listing_chars()")]
    max_listing_chars: usize,

    /// Notation rolled by a bare roll command
    #[serde(default = "default_notation")]
    #[builder(default = "default_notation()")]
    default_notation: String,

    /// Upper bound on a single evaluation (milliseconds)
    #[serde(default = "default_roll_timeout_ms")]
    #[builder(default = "default_roll_timeout_ms()")]
    roll_timeout_ms: u64,
}

fn default_max_listing_chars() -> usize {
    10_000
}

fn default_notation() -> String {
    "1d100".to_string()
}

fn default_roll_timeout_ms() -> u64 {
    5_000
}

impl DiceConfig {
    /// Evaluation timeout as a [`Duration`].
    pub fn roll_timeout(&self) -> Duration {
        Duration::from_millis(self.roll_timeout_ms)
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            max_listing_chars: default_max_listing_chars(),
            default_notation: default_notation(),
            roll_timeout_ms: default_roll_timeout_ms(),
        }
    }
}
