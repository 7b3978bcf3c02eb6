//! Crossover detection between two moving averages.

use crate::types::{AveragePoint, CrossoverEvent, MovingAverageSeries, Signal};
use std::cmp::Ordering;

/// Sign of `a - b`: 1, -1, or 0 when equal (or not comparable).
#[inline]
fn side(a: f64, b: f64) -> i8 {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => 1,
        Some(Ordering::Less) => -1,
        _ => 0,
    }
}

/// Pair up points of both series that share a date.
///
/// Both inputs are strictly increasing by date, so a single merge pass
/// yields their intersection in order.
fn aligned<'a>(
    a: &'a [AveragePoint],
    b: &'a [AveragePoint],
) -> impl Iterator<Item = (&'a AveragePoint, &'a AveragePoint)> + 'a {
    let (mut i, mut j) = (0, 0);
    std::iter::from_fn(move || {
        while i < a.len() && j < b.len() {
            match a[i].date.cmp(&b[j].date) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    let pair = (&a[i], &b[j]);
                    i += 1;
                    j += 1;
                    return Some(pair);
                }
            }
        }
        None
    })
}

/// Find every date where series `a` crosses series `b`.
///
/// Only dates present in both series are compared. A Buy is emitted when
/// `a - b` turns positive after being negative or zero, a Sell when it turns
/// negative after being positive or zero. Runs of equal values keep the last
/// strict side, so touching the other curve without passing it is not a
/// crossing, and passing through an exact tie counts once the new side is
/// reached. Comparing a series with itself never crosses.
///
/// The event price is the value of `a` on the crossing date.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use stocks_core::indicators::detect_crossovers;
/// use stocks_core::{AveragePoint, MovingAverageSeries, Signal};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let series = |values: &[f64]| MovingAverageSeries {
///     window: 1,
///     points: values
///         .iter()
///         .enumerate()
///         .map(|(i, &value)| AveragePoint { date: day(i as u32 + 1), value })
///         .collect(),
/// };
///
/// let fast = series(&[9.0, 10.0, 12.0, 8.0]);
/// let slow = series(&[10.0, 10.0, 10.0, 10.0]);
///
/// let events = detect_crossovers(&fast, &slow);
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[0].signal, Signal::Buy);
/// assert_eq!(events[0].date, day(3));
/// assert_eq!(events[1].signal, Signal::Sell);
/// ```
pub fn detect_crossovers(a: &MovingAverageSeries, b: &MovingAverageSeries) -> Vec<CrossoverEvent> {
    let mut events = Vec::new();
    let mut pairs = aligned(&a.points, &b.points);

    let Some((first_a, first_b)) = pairs.next() else {
        tracing::debug!(
            window_a = a.window,
            window_b = b.window,
            "no overlapping dates between moving averages"
        );
        return events;
    };

    let mut last_side = side(first_a.value, first_b.value);

    for (pa, pb) in pairs {
        let current = side(pa.value, pb.value);
        if current == 0 || current == last_side {
            continue;
        }

        let signal = if current > 0 { Signal::Buy } else { Signal::Sell };
        events.push(CrossoverEvent {
            date: pa.date,
            price: pa.value,
            signal,
        });
        last_side = current;
    }

    tracing::debug!(
        window_a = a.window,
        window_b = b.window,
        events = events.len(),
        "detected crossovers"
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::moving_average;
    use crate::types::{PriceSample, PriceSeries};
    use chrono::{Days, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Series whose first point falls `offset` days after the start date.
    fn series_at(offset: u64, values: &[f64]) -> MovingAverageSeries {
        MovingAverageSeries {
            window: 1,
            points: values
                .iter()
                .enumerate()
                .map(|(i, &value)| AveragePoint {
                    date: start() + Days::new(offset + i as u64),
                    value,
                })
                .collect(),
        }
    }

    fn signals(events: &[CrossoverEvent]) -> Vec<Signal> {
        events.iter().map(|e| e.signal).collect()
    }

    #[test]
    fn test_self_comparison_never_crosses() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect();
        let series = series_at(0, &values);
        assert!(detect_crossovers(&series, &series).is_empty());
    }

    #[test]
    fn test_golden_and_death_cross() {
        let fast = series_at(0, &[10.0, 11.0, 12.0, 11.0, 10.0]);
        let slow = series_at(0, &[11.0, 11.0, 11.0, 11.0, 11.0]);

        let events = detect_crossovers(&fast, &slow);

        // Tie at index 1, strictly above at index 2
        assert_eq!(signals(&events), vec![Signal::Buy, Signal::Sell]);
        assert_eq!(events[0].date, start() + Days::new(2));
        assert_eq!(events[0].price, 12.0);
        // Tie at index 3, strictly below at index 4
        assert_eq!(events[1].date, start() + Days::new(4));
    }

    #[test]
    fn test_touch_without_crossing_is_ignored() {
        let fast = series_at(0, &[12.0, 11.0, 12.0, 11.0, 13.0]);
        let slow = series_at(0, &[11.0, 11.0, 11.0, 11.0, 11.0]);
        assert!(detect_crossovers(&fast, &slow).is_empty());
    }

    #[test]
    fn test_equal_start_then_diverge() {
        let fast = series_at(0, &[5.0, 5.0, 6.0]);
        let slow = series_at(0, &[5.0, 5.0, 5.0]);

        let events = detect_crossovers(&fast, &slow);
        assert_eq!(signals(&events), vec![Signal::Buy]);
        assert_eq!(events[0].date, start() + Days::new(2));
    }

    #[test]
    fn test_compares_only_overlapping_dates() {
        // fast covers days 0..6, slow covers days 3..8
        let fast = series_at(0, &[1.0, 9.0, 1.0, 9.0, 9.0, 1.0]);
        let slow = series_at(3, &[5.0, 5.0, 5.0, 5.0, 5.0]);

        let events = detect_crossovers(&fast, &slow);

        // Only days 3, 4, 5 are compared: above, above, below
        assert_eq!(signals(&events), vec![Signal::Sell]);
        assert_eq!(events[0].date, start() + Days::new(5));
    }

    #[test]
    fn test_disjoint_ranges() {
        let fast = series_at(0, &[1.0, 2.0, 3.0]);
        let slow = series_at(10, &[3.0, 2.0, 1.0]);
        assert!(detect_crossovers(&fast, &slow).is_empty());
    }

    #[test]
    fn test_empty_series() {
        let empty = MovingAverageSeries::empty(200);
        let other = series_at(0, &[1.0, 2.0]);
        assert!(detect_crossovers(&empty, &other).is_empty());
        assert!(detect_crossovers(&other, &empty).is_empty());
    }

    #[test]
    fn test_events_ordered_and_alternating() {
        let start = start();
        let samples = (0..400)
            .map(|i| {
                let x = i as f64;
                PriceSample::new(
                    start + Days::new(i),
                    100.0 + (x / 15.0).sin() * 8.0 + (x / 4.0).cos() * 2.0,
                )
            })
            .collect();
        let series = PriceSeries::new(samples).unwrap();

        let fast = moving_average(&series, 20).unwrap();
        let slow = moving_average(&series, 50).unwrap();
        let events = detect_crossovers(&fast, &slow);

        assert!(events.len() > 2);
        for pair in events.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert_ne!(pair[0].signal, pair[1].signal);
        }
    }
}
