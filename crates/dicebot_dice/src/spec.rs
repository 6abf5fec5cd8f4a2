//! Descriptor parsing and validation.

use dicebot_error::{DiceError, DiceErrorKind, DiceResult};
use std::fmt;

/// Character separating the count from the die size.
pub const SEPARATOR: char = 'd';

/// Largest accepted dice count.
pub const MAX_COUNT: u32 = 100_000;

/// Die size used when the descriptor omits it.
pub const DEFAULT_SIDES: u64 = 6;

/// A validated roll: `count` dice with `sides` faces each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RollSpec {
    count: u32,
    sides: u64,
}

impl RollSpec {
    /// Parse a descriptor such as `3d6`, `d20` or `4d`.
    ///
    /// Validation order matters: a non-roll is reported as
    /// [`DiceErrorKind::Ignorable`] before any numeric field is looked at, and
    /// the count is range checked before the die size is resolved.
    pub fn parse(descriptor: &str) -> DiceResult<Self> {
        let parts: Vec<&str> = descriptor.split(SEPARATOR).collect();
        let [count_part, sides_part] = parts.as_slice() else {
            return Err(DiceError::new(DiceErrorKind::Ignorable(descriptor.to_string())));
        };

        let count = if count_part.is_empty() {
            1
        } else {
            count_part
                .parse::<i64>()
                .map_err(|_| DiceError::new(DiceErrorKind::Parse(count_part.to_string())))?
        };

        if count <= 0 || count > i64::from(MAX_COUNT) {
            return Err(DiceError::new(DiceErrorKind::Range {
                count,
                max: MAX_COUNT,
            }));
        }

        let sides = if sides_part.is_empty() {
            DEFAULT_SIDES
        } else {
            match sides_part.parse::<u64>() {
                Ok(sides) if sides > 0 => sides,
                _ => {
                    return Err(DiceError::new(DiceErrorKind::Evaluation(format!(
                        "invalid die size \"{}\"",
                        sides_part
                    ))));
                }
            }
        };

        Ok(Self {
            count: count as u32,
            sides,
        })
    }

    /// Number of dice.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Faces per die.
    pub fn sides(&self) -> u64 {
        self.sides
    }
}

impl fmt::Display for RollSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.count, SEPARATOR, self.sides)
    }
}
