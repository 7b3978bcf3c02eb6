//! Source of closing price history.
//!
//! Fetching quotes from a market data provider happens outside this crate;
//! the provider is plugged in through [`PriceSource`].

use crate::types::{PriceSeries, TimeWindow};
use crate::{Error, Result};
use std::collections::HashMap;

/// Supplies closing prices for a ticker over a time window.
pub trait PriceSource {
    /// Closing prices for `ticker` restricted to `window`, oldest first.
    fn closing_prices(&self, ticker: &str, window: TimeWindow) -> Result<PriceSeries>;
}

/// Price histories held in memory, keyed by ticker.
#[derive(Debug, Clone, Default)]
pub struct MemoryPriceSource {
    histories: HashMap<String, PriceSeries>,
}

impl MemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full history for a ticker, replacing any previous one.
    pub fn insert(&mut self, ticker: impl Into<String>, history: PriceSeries) {
        self.histories.insert(ticker.into(), history);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_history(mut self, ticker: impl Into<String>, history: PriceSeries) -> Self {
        self.insert(ticker, history);
        self
    }
}

impl PriceSource for MemoryPriceSource {
    fn closing_prices(&self, ticker: &str, window: TimeWindow) -> Result<PriceSeries> {
        self.histories
            .get(ticker)
            .map(|history| history.window(window))
            .ok_or_else(|| Error::UnknownStock(ticker.to_string()))
    }
}
