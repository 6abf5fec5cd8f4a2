//! Dice notation evaluation.
//!
//! A descriptor such as `3d6` or `d20` is parsed into a [`RollSpec`], rolled
//! into a [`RollOutcome`], and rendered as a one-line summary whose roll
//! listing is length capped:
//!
//! ```
//! use dicebot_dice::evaluate;
//!
//! let summary = evaluate("2d6").unwrap();
//! assert!(summary.starts_with("r 2d6: "));
//!
//! // Text without exactly one separator is not a roll and is skipped silently.
//! assert!(evaluate("hello").unwrap_err().is_ignorable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod evaluator;
mod outcome;
mod spec;

pub use config::{DiceConfig, DiceConfigBuilder};
pub use evaluator::{Evaluator, evaluate};
pub use outcome::{RollOutcome, TRUNCATION_MARKER, render_listing};
pub use spec::{DEFAULT_SIDES, MAX_COUNT, RollSpec, SEPARATOR};
