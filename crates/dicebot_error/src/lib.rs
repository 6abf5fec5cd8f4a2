//! Error types for the Dicebot workspace.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use dicebot_error::{ConfigError, DicebotResult};
//!
//! fn load() -> DicebotResult<String> {
//!     Err(ConfigError::new("Missing [dice] section"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dice;
mod error;
mod server;

pub use config::ConfigError;
pub use dice::{DiceError, DiceErrorKind, DiceResult};
pub use error::{DicebotError, DicebotErrorKind, DicebotResult};
pub use server::{ServerError, ServerErrorKind};
