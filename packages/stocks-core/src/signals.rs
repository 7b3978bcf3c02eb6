//! Reduce crossover events to a single trading recommendation.

use crate::types::{CrossoverEvent, Recommendation};

/// Recommendation implied by the most recent crossover.
///
/// Events are expected in date order, as produced by
/// [`detect_crossovers`](crate::indicators::detect_crossovers). With no
/// events the recommendation is [`Recommendation::Hold`].
///
/// # Example
///
/// ```rust
/// use stocks_core::{recommend, Recommendation};
///
/// assert_eq!(recommend(&[]), Recommendation::Hold);
/// ```
pub fn recommend(events: &[CrossoverEvent]) -> Recommendation {
    events
        .last()
        .map(|event| Recommendation::from(event.signal))
        .unwrap_or_default()
}
