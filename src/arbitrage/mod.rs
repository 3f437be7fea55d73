//! Arbitrage module for detecting cross-venue pricing inconsistencies.

pub mod detector;

pub use detector::{detect_arbitrage, ArbitrageOpportunity};
