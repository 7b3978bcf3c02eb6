//! Per-user viewing session.
//!
//! Holds what the chart currently shows (stock, time window, selected
//! moving averages) together with the user's recently viewed list, and runs
//! the analysis the presentation layer renders.

use crate::config::Config;
use crate::indicators::{detect_crossovers, moving_average};
use crate::market::PriceSource;
use crate::recent::{RecentlyViewedCache, RecentlyViewedStore};
use crate::signals::recommend;
use crate::types::{
    CrossoverEvent, MovingAverageSeries, MovingAverageWindow, PriceSeries, Recommendation, Signal,
    StockEntry, TimeWindow,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// One of the two moving average pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

/// Up to two moving averages chosen for the chart.
///
/// Both slots never hold the same window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaSelection {
    pub first: Option<MovingAverageWindow>,
    pub second: Option<MovingAverageWindow>,
}

impl MaSelection {
    /// Put `window` into `slot`. If the other slot holds the same window it is cleared.
    pub fn set(&mut self, slot: Slot, window: MovingAverageWindow) {
        let (target, other) = match slot {
            Slot::First => (&mut self.first, &mut self.second),
            Slot::Second => (&mut self.second, &mut self.first),
        };
        if *other == Some(window) {
            *other = None;
        }
        *target = Some(window);
    }

    /// Selected windows, shortest first.
    pub fn windows(&self) -> Vec<MovingAverageWindow> {
        let mut windows: Vec<_> = [self.first, self.second].into_iter().flatten().collect();
        windows.sort();
        windows
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything the chart needs for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartAnalysis {
    pub stock: StockEntry,
    pub time_window: TimeWindow,
    pub prices: PriceSeries,
    /// Selected moving averages, shortest window first
    pub averages: Vec<MovingAverageSeries>,
    /// Crossovers in date order
    pub events: Vec<CrossoverEvent>,
    pub recommendation: Recommendation,
}

impl ChartAnalysis {
    /// Crossovers where the shorter average moved above the longer one.
    pub fn buy_events(&self) -> impl Iterator<Item = &CrossoverEvent> {
        self.events.iter().filter(|e| e.signal == Signal::Buy)
    }

    /// Crossovers where the shorter average moved below the longer one.
    pub fn sell_events(&self) -> impl Iterator<Item = &CrossoverEvent> {
        self.events.iter().filter(|e| e.signal == Signal::Sell)
    }
}

/// A logged-in user's viewing state.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    current: StockEntry,
    time_window: TimeWindow,
    selection: MaSelection,
    recent: RecentlyViewedCache,
}

impl Session {
    /// Start a session on the configured default stock.
    ///
    /// The default stock is shown but not recorded as viewed.
    pub fn new(user: impl Into<String>, config: &Config, recent: RecentlyViewedCache) -> Self {
        Self {
            user: user.into(),
            current: config.default_stock.clone(),
            time_window: TimeWindow::AllTime,
            selection: MaSelection::default(),
            recent,
        }
    }

    /// Start a session with the user's stored recently viewed list.
    pub fn open(user: &str, config: &Config, store: &RecentlyViewedStore) -> Result<Self> {
        let recent = store.load(user, config.recent_capacity)?;
        tracing::info!(user, recent = recent.len(), "session opened");
        Ok(Self::new(user, config, recent))
    }

    /// Persist the recently viewed list at logout.
    ///
    /// Returns whether a file was written; an empty list is not saved.
    pub fn close(&self, store: &RecentlyViewedStore) -> Result<bool> {
        let saved = store.save(&self.user, &self.recent)?;
        tracing::info!(user = %self.user, saved, "session closed");
        Ok(saved)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Stock currently on the chart.
    pub fn current_stock(&self) -> &StockEntry {
        &self.current
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn selection(&self) -> &MaSelection {
        &self.selection
    }

    pub fn recent(&self) -> &RecentlyViewedCache {
        &self.recent
    }

    /// Switch the chart to another stock.
    ///
    /// Selecting the stock already shown does nothing and returns false.
    /// Otherwise the stock is recorded as viewed, the time window goes back
    /// to one year and the moving average selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStock`](crate::Error::InvalidStock) for an entry
    /// the recently viewed list cannot store; the session is left unchanged.
    pub fn select_stock(&mut self, stock: StockEntry) -> Result<bool> {
        if stock.same_stock(&self.current) {
            return Ok(false);
        }

        self.view(stock)?;
        Ok(true)
    }

    /// Show `stock` and record it as viewed, even if it is already on the chart.
    ///
    /// The entry replaces the current one, so a new display name sticks. When
    /// the ticker changes the time window goes back to one year and the moving
    /// average selection is cleared.
    pub fn view(&mut self, stock: StockEntry) -> Result<()> {
        self.recent.record_access(stock.clone())?;
        tracing::debug!(ticker = %stock.ticker, "stock viewed");

        if !stock.same_stock(&self.current) {
            self.time_window = TimeWindow::OneYear;
            self.selection.clear();
        }
        self.current = stock;
        Ok(())
    }

    pub fn select_time_window(&mut self, window: TimeWindow) {
        self.time_window = window;
    }

    pub fn select_average(&mut self, slot: Slot, window: MovingAverageWindow) {
        self.selection.set(slot, window);
    }

    /// Analyze the current stock with the selected moving averages.
    ///
    /// With two averages the shorter is compared against the longer. With a
    /// single average it is compared against itself, which yields no events
    /// and a Hold. The selection is cleared afterwards.
    pub fn analyze(&mut self, source: &dyn PriceSource) -> Result<ChartAnalysis> {
        let prices = source.closing_prices(&self.current.ticker, self.time_window)?;

        let averages = self
            .selection
            .windows()
            .into_iter()
            .map(|w| moving_average(&prices, w.days()))
            .collect::<Result<Vec<_>>>()?;

        let events = match averages.as_slice() {
            [only] => detect_crossovers(only, only),
            [short, long] => detect_crossovers(short, long),
            _ => Vec::new(),
        };
        let recommendation = recommend(&events);

        tracing::info!(
            ticker = %self.current.ticker,
            window = ?self.time_window,
            averages = averages.len(),
            events = events.len(),
            %recommendation,
            "analysis complete"
        );

        self.selection.clear();

        Ok(ChartAnalysis {
            stock: self.current.clone(),
            time_window: self.time_window,
            prices,
            averages,
            events,
            recommendation,
        })
    }
}
