//! Simple Moving Average (SMA) over closing prices.

use crate::types::{AveragePoint, MovingAverageSeries, PriceSeries};
use crate::{Error, Result};

/// Calculate Simple Moving Average.
///
/// # Arguments
///
/// * `data` - Price series
/// * `period` - Lookback period
///
/// # Returns
///
/// One value per complete window, `data.len() - period + 1` values in total.
/// Empty when `period` is zero or longer than the data.
///
/// # Example
///
/// ```rust
/// use stocks_core::indicators::sma;
///
/// let prices = vec![10.0, 11.0, 12.0, 11.0, 10.0];
/// let sma_values = sma(&prices, 3);
///
/// // First SMA = (10 + 11 + 12) / 3 = 11.0
/// assert_eq!(sma_values.len(), 3);
/// assert!((sma_values[0] - 11.0).abs() < 0.001);
/// ```
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    let n = data.len();
    if period == 0 || period > n {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n - period + 1);

    // Seed with the first full window
    let mut sum: f64 = data[..period].iter().sum();
    result.push(sum / period as f64);

    // Rolling window: add newest, drop oldest
    for i in period..n {
        sum = sum - data[i - period] + data[i];
        result.push(sum / period as f64);
    }

    result
}

/// Compute the moving average of a dated price series.
///
/// Each point is dated with the last sample of its window. A window longer
/// than the series yields an empty result rather than an error.
///
/// # Errors
///
/// Returns [`Error::InvalidWindow`] when `window` is zero.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use stocks_core::indicators::moving_average;
/// use stocks_core::{PriceSample, PriceSeries};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let samples = (0..5)
///     .map(|i| PriceSample::new(start + chrono::Days::new(i), 10.0 + i as f64))
///     .collect();
/// let series = PriceSeries::new(samples).unwrap();
///
/// let ma = moving_average(&series, 2).unwrap();
/// assert_eq!(ma.len(), 4);
/// assert_eq!(ma.points[0].date, start + chrono::Days::new(1));
/// ```
pub fn moving_average(series: &PriceSeries, window: usize) -> Result<MovingAverageSeries> {
    if window == 0 {
        return Err(Error::InvalidWindow(window));
    }

    let values = sma(&series.closes(), window);
    let points: Vec<AveragePoint> = series
        .samples()
        .iter()
        .skip(window - 1)
        .zip(values)
        .map(|(sample, value)| AveragePoint {
            date: sample.date,
            value,
        })
        .collect();

    tracing::debug!(
        window,
        samples = series.len(),
        points = points.len(),
        "computed moving average"
    );

    Ok(MovingAverageSeries { window, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceSample;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let samples = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceSample::new(start + Days::new(i as u64), close))
            .collect();
        PriceSeries::new(samples).unwrap()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        // (1 + 2 + 3) / 3 = 2.0
        assert_relative_eq!(result[0], 2.0);
        // (2 + 3 + 4) / 3 = 3.0
        assert_relative_eq!(result[1], 3.0);
        // (3 + 4 + 5) / 3 = 4.0
        assert_relative_eq!(result[2], 4.0);
    }

    #[test]
    fn test_sma_period_1() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 1);

        // Period 1 SMA should equal the data
        assert_eq!(result, data);
    }

    #[test]
    fn test_sma_period_larger_than_data() {
        let data = vec![1.0, 2.0, 3.0];
        assert!(sma(&data, 10).is_empty());
    }

    #[test]
    fn test_sma_period_equal_to_data() {
        let data = vec![2.0, 4.0, 6.0];
        let result = sma(&data, 3);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(result[0], 4.0);
    }

    #[test]
    fn test_empty_data() {
        let data: Vec<f64> = vec![];
        assert!(sma(&data, 3).is_empty());
    }

    #[test]
    fn test_moving_average_rejects_zero_window() {
        let series = series_from(&[1.0, 2.0]);
        assert!(matches!(
            moving_average(&series, 0),
            Err(Error::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_moving_average_insufficient_data() {
        let series = series_from(&[1.0, 2.0, 3.0]);
        let ma = moving_average(&series, 4).unwrap();
        assert!(ma.is_empty());
        assert_eq!(ma.window, 4);

        let ma = moving_average(&PriceSeries::default(), 20).unwrap();
        assert!(ma.is_empty());
    }

    #[test]
    fn test_moving_average_length_and_first_value() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let series = series_from(&closes);

        for window in [1, 5, 20, 30] {
            let ma = moving_average(&series, window).unwrap();
            assert_eq!(ma.len(), closes.len() - window + 1);

            let expected = closes[..window].iter().sum::<f64>() / window as f64;
            assert_relative_eq!(ma.points[0].value, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_moving_average_dates_are_source_suffix() {
        let series = series_from(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let ma = moving_average(&series, 4).unwrap();

        let source_dates: Vec<_> = series.samples().iter().map(|s| s.date).collect();
        let ma_dates: Vec<_> = ma.points.iter().map(|p| p.date).collect();
        assert_eq!(ma_dates, source_dates[3..].to_vec());
    }

    #[test]
    fn test_rolling_sum_matches_direct_mean() {
        let closes: Vec<f64> = (0..500).map(|i| 50.0 + (i % 37) as f64 * 1.25).collect();
        let result = sma(&closes, 50);

        for (i, value) in result.iter().enumerate() {
            let direct = closes[i..i + 50].iter().sum::<f64>() / 50.0;
            assert_relative_eq!(*value, direct, epsilon = 1e-9);
        }
    }
}
