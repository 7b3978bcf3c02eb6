//! Core data types for the StocksRUs analysis engine.

use crate::{Error, Result};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single closing price observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceSample {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price on that date
    pub close: f64,
}

impl PriceSample {
    /// Create a new sample.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Closing prices for one stock, strictly increasing by date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "Vec<PriceSample>", into = "Vec<PriceSample>")]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    /// Build a series, rejecting samples that are not strictly increasing by date.
    pub fn new(samples: Vec<PriceSample>) -> Result<Self> {
        if let Some(index) = samples
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(Error::UnorderedSeries { index: index + 1 });
        }
        Ok(Self { samples })
    }

    /// All samples in date order.
    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.close).collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Date of the most recent sample.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.samples.last().map(|s| s.date)
    }

    /// Restrict the series to the given time window.
    ///
    /// Windows are measured back from the most recent sample, so a one year
    /// window of a history ending on 2024-06-28 starts after 2023-06-28.
    /// `AllTime` returns the whole series.
    pub fn window(&self, window: TimeWindow) -> PriceSeries {
        let (Some(years), Some(last)) = (window.years(), self.last_date()) else {
            return self.clone();
        };

        let Some(cutoff) = last.checked_sub_months(Months::new(years * 12)) else {
            return self.clone();
        };

        let start = self.samples.partition_point(|s| s.date <= cutoff);
        Self {
            samples: self.samples[start..].to_vec(),
        }
    }
}

impl TryFrom<Vec<PriceSample>> for PriceSeries {
    type Error = Error;

    fn try_from(samples: Vec<PriceSample>) -> Result<Self> {
        Self::new(samples)
    }
}

impl From<PriceSeries> for Vec<PriceSample> {
    fn from(series: PriceSeries) -> Self {
        series.samples
    }
}

/// One point of a moving average curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AveragePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A moving average derived from a [`PriceSeries`].
///
/// Holds one point per date that has a full window of preceding samples,
/// so the first `window - 1` dates of the source series are absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovingAverageSeries {
    /// Window length in samples
    pub window: usize,
    /// Averages in date order
    pub points: Vec<AveragePoint>,
}

impl MovingAverageSeries {
    /// Create an empty series for the given window.
    pub fn empty(window: usize) -> Self {
        Self {
            window,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Direction of a crossover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
}

/// A point where two moving averages cross.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CrossoverEvent {
    /// Date the new ordering is first observed
    pub date: NaiveDate,
    /// Value of the first (shorter) average on that date
    pub price: f64,
    /// Buy when the first average moved above the second, Sell otherwise
    pub signal: Signal,
}

/// Current trading recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    #[default]
    Hold,
    Buy,
    Sell,
}

impl From<Signal> for Recommendation {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Buy => Recommendation::Buy,
            Signal::Sell => Recommendation::Sell,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::Hold => "HOLD",
            Recommendation::Buy => "BUY",
            Recommendation::Sell => "SELL",
        };
        f.write_str(label)
    }
}

/// Moving average lengths offered to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MovingAverageWindow {
    TwentyDay,
    FiftyDay,
    HundredDay,
    TwoHundredDay,
}

impl MovingAverageWindow {
    /// Every selectable window, shortest first.
    pub const ALL: [MovingAverageWindow; 4] = [
        MovingAverageWindow::TwentyDay,
        MovingAverageWindow::FiftyDay,
        MovingAverageWindow::HundredDay,
        MovingAverageWindow::TwoHundredDay,
    ];

    /// Window length in trading samples.
    pub fn days(&self) -> usize {
        match self {
            MovingAverageWindow::TwentyDay => 20,
            MovingAverageWindow::FiftyDay => 50,
            MovingAverageWindow::HundredDay => 100,
            MovingAverageWindow::TwoHundredDay => 200,
        }
    }

    /// Window with the given length, if it is one of the selectable ones.
    pub fn from_days(days: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.days() == days)
    }

    /// Label used in selection lists, e.g. "20 Days".
    pub fn label(&self) -> String {
        format!("{} Days", self.days())
    }

    /// Legend name of the plotted curve.
    pub fn series_name(&self) -> String {
        format!("Moving Average: {}", self.label())
    }
}

impl FromStr for MovingAverageWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let days = s
            .trim()
            .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
            .parse::<usize>()
            .map_err(|_| Error::InvalidOperation(format!("Unknown moving average: {}", s)))?;

        Self::from_days(days).ok_or(Error::InvalidWindow(days))
    }
}

/// Span of history shown on the chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TimeWindow {
    OneYear,
    TwoYears,
    FiveYears,
    #[default]
    AllTime,
}

impl TimeWindow {
    /// Number of years covered, `None` for all available history.
    pub fn years(&self) -> Option<u32> {
        match self {
            TimeWindow::OneYear => Some(1),
            TimeWindow::TwoYears => Some(2),
            TimeWindow::FiveYears => Some(5),
            TimeWindow::AllTime => None,
        }
    }

    /// Legend name of the closing price line.
    pub fn series_name(&self) -> &'static str {
        match self {
            TimeWindow::OneYear => "Closing Prices: One Year",
            TimeWindow::TwoYears => "Closing Prices: Two Years",
            TimeWindow::FiveYears => "Closing Prices: Five Years",
            TimeWindow::AllTime => "Closing Prices: All Time",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1y" | "1" | "one_year" => Ok(TimeWindow::OneYear),
            "2y" | "2" | "two_years" => Ok(TimeWindow::TwoYears),
            "5y" | "5" | "five_years" => Ok(TimeWindow::FiveYears),
            "all" | "all_time" | "max" => Ok(TimeWindow::AllTime),
            other => Err(Error::InvalidOperation(format!(
                "Unknown time window: {}",
                other
            ))),
        }
    }
}

/// A stock the user has looked at.
///
/// Two entries refer to the same stock when their tickers match exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockEntry {
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub ticker: String,
}

impl StockEntry {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
        }
    }

    /// Check that the entry survives the `name,ticker` line format.
    ///
    /// The ticker must be non-empty, neither field may contain a line break,
    /// and the name may not contain a comma. Tickers may contain commas since
    /// a record is split at its first one.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.is_empty() {
            return Err(Error::InvalidStock(format!(
                "empty ticker for \"{}\"",
                self.name
            )));
        }
        if self.name.contains(['\n', '\r']) || self.ticker.contains(['\n', '\r']) {
            return Err(Error::InvalidStock(format!(
                "line break in {:?},{:?}",
                self.name, self.ticker
            )));
        }
        if self.name.contains(',') {
            return Err(Error::InvalidStock(format!(
                "comma in name \"{}\"",
                self.name
            )));
        }
        Ok(())
    }

    /// Whether both entries identify the same instrument.
    pub fn same_stock(&self, other: &StockEntry) -> bool {
        self.ticker == other.ticker
    }
}

/// API response wrapper used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_series_rejects_unordered_dates() {
        let samples = vec![
            PriceSample::new(date(2024, 1, 2), 10.0),
            PriceSample::new(date(2024, 1, 3), 11.0),
            PriceSample::new(date(2024, 1, 3), 12.0),
        ];
        let result = PriceSeries::new(samples);
        assert!(matches!(result, Err(Error::UnorderedSeries { index: 2 })));
    }

    #[test]
    fn test_series_deserialize_validates_order() {
        let json = r#"[{"date":"2024-01-03","close":1.0},{"date":"2024-01-02","close":2.0}]"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());

        let json = r#"[{"date":"2024-01-02","close":1.0},{"date":"2024-01-03","close":2.0}]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_window_trims_to_trailing_years() {
        let samples = vec![
            PriceSample::new(date(2020, 6, 1), 1.0),
            PriceSample::new(date(2022, 6, 1), 2.0),
            PriceSample::new(date(2023, 6, 1), 3.0),
            PriceSample::new(date(2023, 7, 1), 4.0),
            PriceSample::new(date(2024, 6, 1), 5.0),
        ];
        let series = PriceSeries::new(samples).unwrap();

        // Cutoff 2023-06-01 is excluded
        let one_year = series.window(TimeWindow::OneYear);
        assert_eq!(one_year.closes(), vec![4.0, 5.0]);

        let two_years = series.window(TimeWindow::TwoYears);
        assert_eq!(two_years.closes(), vec![3.0, 4.0, 5.0]);

        assert_eq!(series.window(TimeWindow::AllTime), series);
        assert_eq!(series.window(TimeWindow::FiveYears), series);
    }

    #[test]
    fn test_window_of_empty_series() {
        let series = PriceSeries::default();
        assert!(series.window(TimeWindow::OneYear).is_empty());
    }

    #[test]
    fn test_moving_average_window_parse() {
        assert_eq!(
            "20".parse::<MovingAverageWindow>().unwrap(),
            MovingAverageWindow::TwentyDay
        );
        assert_eq!(
            "200 Days".parse::<MovingAverageWindow>().unwrap(),
            MovingAverageWindow::TwoHundredDay
        );
        assert!(matches!(
            "30".parse::<MovingAverageWindow>(),
            Err(Error::InvalidWindow(30))
        ));
        assert_eq!(MovingAverageWindow::FiftyDay.label(), "50 Days");
    }

    #[test]
    fn test_time_window_parse() {
        assert_eq!("1y".parse::<TimeWindow>().unwrap(), TimeWindow::OneYear);
        assert_eq!("ALL".parse::<TimeWindow>().unwrap(), TimeWindow::AllTime);
        assert!("3y".parse::<TimeWindow>().is_err());
        assert_eq!(TimeWindow::FiveYears.series_name(), "Closing Prices: Five Years");
    }

    #[test]
    fn test_recommendation_display() {
        assert_eq!(Recommendation::default().to_string(), "HOLD");
        assert_eq!(Recommendation::from(Signal::Buy).to_string(), "BUY");
        assert_eq!(Recommendation::from(Signal::Sell).to_string(), "SELL");
    }

    #[test]
    fn test_stock_identity_is_ticker() {
        let a = StockEntry::new("Apple", "AAPL");
        let b = StockEntry::new("Apple Inc.", "AAPL");
        let c = StockEntry::new("Apple", "aapl");
        assert!(a.same_stock(&b));
        assert!(!a.same_stock(&c));
    }

    #[test]
    fn test_stock_entry_validation() {
        assert!(StockEntry::new("DOW Jones 30", "^DJI").validate().is_ok());
        assert!(StockEntry::new("Berkshire", "BRK,B").validate().is_ok());

        for bad in [
            StockEntry::new("Nameless", ""),
            StockEntry::new("Berkshire Hathaway, Inc.", "BRK-B"),
            StockEntry::new("Apple\nInc.", "AAPL"),
            StockEntry::new("Apple", "AA\rPL"),
        ] {
            assert!(matches!(bad.validate(), Err(Error::InvalidStock(_))));
        }
    }

    #[test]
    fn test_moving_average_window_from_days() {
        assert_eq!(
            MovingAverageWindow::from_days(100),
            Some(MovingAverageWindow::HundredDay)
        );
        assert_eq!(MovingAverageWindow::from_days(30), None);
        assert_eq!(
            MovingAverageWindow::TwentyDay.series_name(),
            "Moving Average: 20 Days"
        );
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
