//! Shared default roll notation.

use parking_lot::RwLock;
use std::sync::Arc;

/// Game modes selectable with the `mode` command.
///
/// Only the lowercase command names parse; [`label`](Self::label) is for
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString)]
pub enum Mode {
    /// Call of Cthulhu, percentile dice
    #[strum(serialize = "coc")]
    Coc,
    /// Dungeons & Dragons, d20
    #[strum(serialize = "dnd")]
    Dnd,
}

impl Mode {
    /// Name shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Coc => "COC",
            Mode::Dnd => "D&D",
        }
    }

    /// Notation rolled by a bare roll command in this mode.
    pub fn default_notation(&self) -> &'static str {
        match self {
            Mode::Coc => "1d100",
            Mode::Dnd => "1d20",
        }
    }
}

/// Notation used when a roll command carries no descriptor.
///
/// Clones share the same value. Reads and writes are atomic with respect to
/// each other.
#[derive(Debug, Clone)]
pub struct DefaultNotation {
    inner: Arc<RwLock<String>>,
}

impl DefaultNotation {
    /// Creates a holder with an initial notation.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Current notation.
    pub fn get(&self) -> String {
        self.inner.read().clone()
    }

    /// Replaces the notation, returning the previous one.
    pub fn set(&self, notation: impl Into<String>) -> String {
        std::mem::replace(&mut *self.inner.write(), notation.into())
    }

    /// Switches to the notation of `mode`.
    pub fn apply(&self, mode: Mode) -> String {
        self.set(mode.default_notation())
    }
}
