//! Common market data model shared across providers.
//!
//! This module handles:
//! - The provider (`Source`) enumeration
//! - Normalized per-venue market records
//! - Cross-venue aggregated question groups

pub mod types;

pub use types::{AggregatedQuestion, Market, Source, SourceQuote};
