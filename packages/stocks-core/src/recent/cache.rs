//! Bounded most-recent-first list of viewed stocks.

use crate::types::StockEntry;
use crate::{Error, Result};
use std::collections::VecDeque;

/// Recently viewed stocks, most recent first.
///
/// Holds at most `capacity` entries with unique tickers. Viewing a stock that
/// is already present moves it to the front; viewing a new stock when full
/// drops the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentlyViewedCache {
    capacity: usize,
    entries: VecDeque<StockEntry>,
}

impl RecentlyViewedCache {
    /// Create an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        })
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently viewed stock.
    pub fn front(&self) -> Option<&StockEntry> {
        self.entries.front()
    }

    /// Record that the user viewed `entry`.
    ///
    /// Any entry with the same ticker is replaced, the new entry goes to the
    /// front, and entries beyond capacity are dropped from the back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStock`] for an entry that [`to_text`](Self::to_text)
    /// could not write back faithfully; the cache is left unchanged.
    pub fn record_access(&mut self, entry: StockEntry) -> Result<()> {
        entry.validate()?;

        if let Some(idx) = self.entries.iter().position(|e| e.same_stock(&entry)) {
            self.entries.remove(idx);
        }

        self.entries.push_front(entry);

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(ticker = %evicted.ticker, "evicted from recently viewed");
            }
        }
        Ok(())
    }

    /// Iterate entries from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &StockEntry> + '_ {
        self.entries.iter()
    }

    /// Persisted text form: one `name,ticker` line per entry, most recent first.
    ///
    /// An empty cache serializes to an empty string.
    pub fn to_text(&self) -> String {
        self.iter()
            .map(|entry| format!("{},{}\n", entry.name, entry.ticker))
            .collect()
    }

    /// Rebuild a cache from its persisted text form.
    ///
    /// Each non-empty line is split at its first comma into name and ticker.
    /// Lines without a comma or with an empty ticker are skipped. Order is
    /// kept as read; a repeated ticker keeps its first (more recent) line, and
    /// lines beyond `capacity` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn from_text(text: &str, capacity: usize) -> Result<Self> {
        let mut cache = Self::new(capacity)?;

        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let Some((name, ticker)) = line.split_once(',') else {
                tracing::warn!(line = number + 1, "skipping recently viewed record without separator");
                continue;
            };

            if ticker.is_empty() {
                tracing::warn!(line = number + 1, "skipping recently viewed record without ticker");
                continue;
            }

            let entry = StockEntry::new(name, ticker);
            if cache.entries.iter().any(|e| e.same_stock(&entry)) {
                tracing::warn!(line = number + 1, ticker, "skipping duplicate recently viewed ticker");
                continue;
            }

            if cache.entries.len() == capacity {
                tracing::warn!(capacity, "recently viewed records exceed capacity, ignoring the rest");
                break;
            }

            cache.entries.push_back(entry);
        }

        Ok(cache)
    }
}

impl<'a> IntoIterator for &'a RecentlyViewedCache {
    type Item = &'a StockEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, StockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
