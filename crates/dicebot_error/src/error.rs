//! Top-level error wrapper types.

use crate::{ConfigError, DiceError, ServerError};

/// Every error the workspace can surface at the top level.
///
/// # Examples
///
/// ```
/// use dicebot_error::{ConfigError, DicebotError};
///
/// let err: DicebotError = ConfigError::new("bad bind address").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DicebotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Dice evaluation error
    #[from(DiceError)]
    Dice(DiceError),
    /// HTTP server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Dicebot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Dicebot Error: {}", _0)]
pub struct DicebotError(Box<DicebotErrorKind>);

impl DicebotError {
    /// Create a new error from a kind.
    pub fn new(kind: DicebotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DicebotErrorKind {
        &self.0
    }
}

impl<T> From<T> for DicebotError
where
    T: Into<DicebotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Dicebot operations.
pub type DicebotResult<T> = std::result::Result<T, DicebotError>;
