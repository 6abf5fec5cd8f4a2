//! Roll results and their textual rendering.

use crate::spec::RollSpec;
use derive_getters::Getters;
use rand::Rng;

/// Appended to a roll listing that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Result of one roll of a [`RollSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RollOutcome {
    spec: RollSpec,
    total: u128,
    rolls: Vec<u64>,
    summary: String,
}

impl RollOutcome {
    /// Draw every die of `spec` from `rng` and render the summary.
    pub(crate) fn roll<R: Rng + ?Sized>(spec: RollSpec, rng: &mut R, max_listing_chars: usize) -> Self {
        let rolls: Vec<u64> = (0..spec.count())
            .map(|_| rng.gen_range(1..=spec.sides()))
            .collect();
        let total: u128 = rolls.iter().map(|&r| u128::from(r)).sum();
        let summary = format!(
            "r {}: {} ({})",
            spec,
            total,
            render_listing(&rolls, max_listing_chars)
        );

        Self {
            spec,
            total,
            rolls,
            summary,
        }
    }

    /// Consume the outcome, keeping only the summary.
    pub fn into_summary(self) -> String {
        self.summary
    }
}

/// Comma-join `rolls`, capped at `max_chars` including [`TRUNCATION_MARKER`].
///
/// Only as much of the listing as the cap allows is ever rendered. A cap
/// shorter than the marker gets a marker cut down to the cap.
///
/// ```
/// use dicebot_dice::render_listing;
///
/// assert_eq!(render_listing(&[3, 1, 6], 100), "3, 1, 6");
/// assert_eq!(render_listing(&[3, 1, 6], 6), "3, ...");
/// assert_eq!(render_listing(&[3, 1, 6], 2), "..");
/// ```
pub fn render_listing(rolls: &[u64], max_chars: usize) -> String {
    let mut listing = String::with_capacity(max_chars.min(rolls.len() * 8) + TRUNCATION_MARKER.len());

    for (i, roll) in rolls.iter().enumerate() {
        if i > 0 {
            listing.push_str(", ");
        }
        listing.push_str(&roll.to_string());
        if listing.len() > max_chars {
            break;
        }
    }

    if listing.len() > max_chars {
        // Rendered text is ASCII, so any byte offset is a char boundary.
        let kept = max_chars.saturating_sub(TRUNCATION_MARKER.len());
        let marker_len = max_chars - kept;
        listing.truncate(kept);
        listing.push_str(&TRUNCATION_MARKER[..marker_len]);
    }
    listing
}
