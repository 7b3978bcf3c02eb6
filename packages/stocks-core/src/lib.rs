//! Stocks Core - Moving average analysis and recently viewed stocks.
//!
//! This crate provides the engine behind the StocksRUs chart:
//!
//! - **Moving averages**: SMA curves over a stock's closing prices
//! - **Crossovers**: Buy/Sell points where two averages cross
//! - **Recommendation**: HOLD / BUY / SELL from the most recent crossover
//! - **Recently viewed**: Bounded most-recent-first list with per-user text persistence
//! - **Session**: Per-user chart state tying the pieces together
//!
//! # Example
//!
//! ```rust
//! use chrono::{Days, NaiveDate};
//! use stocks_core::indicators::{detect_crossovers, moving_average};
//! use stocks_core::{recommend, PriceSample, PriceSeries, Recommendation};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let samples = (0..120u64)
//!     .map(|i| {
//!         let close = if i < 60 { 100.0 } else { 100.0 + (i - 59) as f64 };
//!         PriceSample::new(start + Days::new(i), close)
//!     })
//!     .collect();
//! let prices = PriceSeries::new(samples)?;
//!
//! let fast = moving_average(&prices, 20)?;
//! let slow = moving_average(&prices, 50)?;
//! let events = detect_crossovers(&fast, &slow);
//!
//! assert_eq!(recommend(&events), Recommendation::Buy);
//! # Ok::<(), stocks_core::Error>(())
//! ```

pub mod config;
pub mod indicators;
pub mod market;
pub mod recent;
pub mod session;
pub mod signals;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, AveragePoint, CrossoverEvent, MovingAverageSeries, MovingAverageWindow,
    PriceSample, PriceSeries, Recommendation, Signal, StockEntry, TimeWindow,
};

// Re-export main functionality
pub use config::Config;
pub use indicators::{detect_crossovers, moving_average, sma};
pub use market::{MemoryPriceSource, PriceSource};
pub use recent::{RecentlyViewedCache, RecentlyViewedStore};
pub use session::{ChartAnalysis, MaSelection, Session, Slot};
pub use signals::recommend;

/// Error types for stocks-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid moving average window: {0}")]
    InvalidWindow(usize),

    #[error("Invalid recently viewed capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Price samples out of date order at index {index}")]
    UnorderedSeries { index: usize },

    #[error("Invalid stock entry: {0}")]
    InvalidStock(String),

    #[error("Invalid user id: {0:?}")]
    InvalidUser(String),

    #[error("Unknown stock: {0}")]
    UnknownStock(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for stocks-core operations.
pub type Result<T> = std::result::Result<T, Error>;
