//! Dicebot - dice rolling chat bot backend
//!
//! Dicebot answers chat messages such as `r 3d6` with a roll summary and
//! drops webhook events that the platform delivers more than once.
//!
//! # Architecture
//!
//! - `dicebot_error` - Error types
//! - `dicebot_cache` - Idempotency cache with periodic sweep
//! - `dicebot_dice` - Dice notation parsing, rolling and formatting
//! - `dicebot_bot` - Configuration, message routing and the callback server
//!
//! This crate (`dicebot`) re-exports everything for convenience and hosts
//! the command-line interface.
//!
//! # Quick Start
//!
//! ```
//! use dicebot::{IdempotencyCache, IdempotencyCacheConfig, evaluate};
//!
//! let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());
//! if cache.check_and_mark("om_7d2a") {
//!     let summary = evaluate("3d6").unwrap();
//!     assert!(summary.starts_with("r 3d6: "));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
mod observability;

pub use observability::{ObservabilityConfig, init_observability, init_observability_with_config};

pub use dicebot_bot::{
    ApiState, BotMetrics, BotServer, CallbackResponse, DefaultNotation, DicebotConfig, Dispatch,
    ExpressionEvaluator, InboundEvent, MessageRouter, MetricsSnapshot, Mode, ServerConfig,
    create_router,
};
pub use dicebot_cache::{Clock, IdempotencyCache, IdempotencyCacheConfig, ManualClock, SystemClock};
pub use dicebot_dice::{DiceConfig, Evaluator, MAX_COUNT, RollOutcome, RollSpec, evaluate};
pub use dicebot_error::{
    ConfigError, DiceError, DiceErrorKind, DiceResult, DicebotError, DicebotErrorKind,
    DicebotResult, ServerError, ServerErrorKind,
};
