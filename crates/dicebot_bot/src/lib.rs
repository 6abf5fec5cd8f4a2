//! Chat-facing orchestration for Dicebot.
//!
//! Inbound events pass through the idempotency cache, then the
//! [`MessageRouter`] decides whether the text is a roll, a mode switch or an
//! expression and produces at most one reply.
//!
//! - [`DicebotConfig`]: layered TOML configuration
//! - [`DefaultNotation`]: shared default roll notation
//! - [`BotServer`]: HTTP callback server with the background sweeper

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod metrics;
mod notation;
mod router;
mod server;

pub use api::{ApiState, CallbackResponse, create_router};
pub use config::{DicebotConfig, ServerConfig, ServerConfigBuilder};
pub use metrics::{BotMetrics, MetricsSnapshot};
pub use notation::{DefaultNotation, Mode};
pub use router::{Dispatch, ExpressionEvaluator, InboundEvent, MessageRouter};
pub use server::BotServer;
