//! Technical indicators for trading analysis.
//!
//! - **SMA**: Simple Moving Average over closing prices
//! - **Crossovers**: Buy/Sell points where two moving averages cross

mod crossover;
mod sma;

pub use crossover::detect_crossovers;
pub use sma::{moving_average, sma};
