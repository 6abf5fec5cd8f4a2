//! Evaluation entry point with fault isolation.

use crate::config::DiceConfig;
use crate::outcome::RollOutcome;
use crate::spec::RollSpec;
use dicebot_error::{DiceError, DiceErrorKind, DiceResult};
use rand::Rng;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Evaluates roll descriptors into bounded summaries.
///
/// Holds no mutable state and is safe to share across threads. Randomness
/// comes from the caller's generator or from [`rand::thread_rng`], which is
/// seeded from OS entropy once per thread.
#[derive(Debug, Clone)]
pub struct Evaluator {
    max_listing_chars: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(&DiceConfig::default())
    }
}

impl Evaluator {
    /// Create an evaluator from configuration.
    pub fn new(config: &DiceConfig) -> Self {
        Self {
            max_listing_chars: *config.max_listing_chars(),
        }
    }

    /// Evaluate `descriptor` using the thread-local generator.
    pub fn evaluate(&self, descriptor: &str) -> DiceResult<String> {
        self.evaluate_with(descriptor, &mut rand::thread_rng())
    }

    /// Evaluate `descriptor` drawing from `rng`.
    pub fn evaluate_with<R: Rng + ?Sized>(&self, descriptor: &str, rng: &mut R) -> DiceResult<String> {
        self.roll_with(descriptor, rng).map(RollOutcome::into_summary)
    }

    /// Parse and roll `descriptor`, returning the full outcome.
    ///
    /// A panic raised while drawing is caught here and reported as
    /// [`DiceErrorKind::Evaluation`].
    pub fn roll_with<R: Rng + ?Sized>(&self, descriptor: &str, rng: &mut R) -> DiceResult<RollOutcome> {
        let spec = RollSpec::parse(descriptor)?;
        debug!(descriptor, count = spec.count(), sides = spec.sides(), "Rolling");

        let max_listing_chars = self.max_listing_chars;
        panic::catch_unwind(AssertUnwindSafe(|| RollOutcome::roll(spec, rng, max_listing_chars)))
            .map_err(|payload| {
                let reason = panic_reason(payload.as_ref());
                warn!(descriptor, reason, "Roll panicked");
                DiceError::new(DiceErrorKind::Evaluation(format!("panicked: {}", reason)))
            })
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic reason"
    }
}

/// Evaluate `descriptor` with default settings.
pub fn evaluate(descriptor: &str) -> DiceResult<String> {
    Evaluator::default().evaluate(descriptor)
}
