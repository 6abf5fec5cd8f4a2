//! Configuration for the bot server.
//!
//! Sources are merged in this order, later ones taking precedence:
//! - Bundled defaults (include_str! from dicebot.toml)
//! - ~/.config/dicebot/dicebot.toml
//! - ./dicebot.toml
//! - `DICEBOT__<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use dicebot_cache::IdempotencyCacheConfig;
use dicebot_dice::{DiceConfig, TRUNCATION_MARKER};
use dicebot_error::{ConfigError, DicebotError, DicebotResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../dicebot.toml");

/// HTTP and chat platform settings.
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
pub struct ServerConfig {
    /// Socket address the callback server listens on
    #[serde(default = "default_bind")]
    #[builder(default = "default_bind()")]
    bind: String,

    /// Message text that, sent in reply to a roll, asks for a reroll
    #[serde(default = "default_mention_token")]
    #[builder(default = "default_mention_token()")]
    mention_token: String,
}

fn default_bind() -> String {
    "0.0.0.0:9726".to_string()
}

fn default_mention_token() -> String {
    "@_user_1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            mention_token: default_mention_token(),
        }
    }
}

/// Complete Dicebot configuration.
///
/// ```toml
/// [cache]
/// retention_secs = 86400
/// sweep_interval_secs = 86400
///
/// [dice]
/// default_notation = "1d100"
///
/// [server]
/// bind = "0.0.0.0:9726"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicebotConfig {
    /// Idempotency cache settings
    #[serde(default)]
    pub cache: IdempotencyCacheConfig,
    /// Dice evaluation settings
    #[serde(default)]
    pub dice: DiceConfig,
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl DicebotConfig {
    /// Load configuration from the standard locations.
    ///
    /// ```no_run
    /// use dicebot_bot::DicebotConfig;
    ///
    /// let config = DicebotConfig::load()?;
    /// println!("listening on {}", config.server.bind());
    /// # Ok::<(), dicebot_error::DicebotError>(())
    /// ```
    #[instrument]
    pub fn load() -> DicebotResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::bundled();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/dicebot/dicebot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("dicebot").required(false));

        Self::finish(builder.add_source(Self::environment()))
    }

    /// Load configuration from an explicit file layered over the bundled defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> DicebotResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DicebotError::from(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.display()
            ))));
        }

        let builder = Self::bundled()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Self::environment());
        Self::finish(builder)
    }

    /// Parse configuration from TOML text layered over the bundled defaults.
    pub fn from_toml_str(toml: &str) -> DicebotResult<Self> {
        Self::finish(Self::bundled().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn bundled() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix("DICEBOT")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> DicebotResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                DicebotError::from(ConfigError::new(format!("Failed to build configuration: {}", e)))
            })?
            .try_deserialize()
            .map_err(|e| {
                DicebotError::from(ConfigError::new(format!(
                    "Failed to deserialize configuration: {}",
                    e
                )))
            })?;

        let max_listing_chars = *config.dice.max_listing_chars();
        if max_listing_chars < TRUNCATION_MARKER.len() {
            return Err(ConfigError::new(format!(
                "dice.max_listing_chars must be at least {}, got {}",
                TRUNCATION_MARKER.len(),
                max_listing_chars
            ))
            .into());
        }

        debug!(
            bind = %config.server.bind(),
            default_notation = %config.dice.default_notation(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
