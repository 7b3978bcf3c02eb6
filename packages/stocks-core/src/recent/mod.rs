//! Recently viewed stocks.
//!
//! Provides the bounded recency list and its per-user text persistence.

mod cache;
mod store;

pub use cache::RecentlyViewedCache;
pub use store::RecentlyViewedStore;
