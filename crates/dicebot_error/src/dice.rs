//! Dice evaluation error types.

/// Kinds of dice evaluation failures.
///
/// `Ignorable` marks input that is not a roll descriptor at all. Callers
/// must drop it silently instead of reporting it to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DiceErrorKind {
    /// Input is not a dice descriptor
    #[display("not a dice descriptor: \"{}\"", _0)]
    Ignorable(String),

    /// Dice count is not a base-10 integer
    #[display("invalid dice string: expected number of dice count, but got \"{}\"", _0)]
    Parse(String),

    /// Dice count outside (0, max]
    #[display("invalid dice count range: dice count should in range (0, {}]", max)]
    Range {
        /// Requested count
        count: i64,
        /// Inclusive upper bound
        max: u32,
    },

    /// Die size could not be resolved or the simulation faulted
    #[display("roll failed: {}", _0)]
    Evaluation(String),
}

/// Dice error with location tracking.
///
/// # Examples
///
/// ```
/// use dicebot_error::{DiceError, DiceErrorKind};
///
/// let err = DiceError::new(DiceErrorKind::Parse("x".to_string()));
/// assert!(!err.is_ignorable());
/// assert!(err.kind.to_string().contains("\"x\""));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dice Error: {} at line {} in {}", kind, line, file)]
pub struct DiceError {
    /// The kind of error that occurred
    pub kind: DiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DiceError {
    /// Create a new dice error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the input should be skipped without a reply.
    pub fn is_ignorable(&self) -> bool {
        matches!(self.kind, DiceErrorKind::Ignorable(_))
    }

    /// Diagnostic suitable for showing to the user.
    pub fn diagnostic(&self) -> String {
        self.kind.to_string()
    }
}

/// Result type for dice evaluation.
pub type DiceResult<T> = Result<T, DiceError>;
