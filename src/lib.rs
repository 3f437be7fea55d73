//! Cross-market prediction odds aggregator.
//!
//! This library fetches binary-outcome questions from several independent
//! prediction markets (Polymarket, Metaculus, Manifold), merges questions
//! that appear on more than one venue, and flags cross-venue pricing
//! inconsistencies: if the best YES price and the best NO price together
//! cost less than certainty, backing both locks in the difference.
//!
//! # Strategy
//!
//! Each venue quotes an implied probability in `[0, 1]`. After merging
//! equivalent questions, the scanner takes the best YES across venues and
//! the best NO across venues:
//!
//! ```text
//! Polymarket YES: 0.55
//! Metaculus  NO:  0.40
//! ─────────────────────
//! Implied:        0.95 < 0.98 threshold ✅
//! Edge:           5.0% before costs
//! ```
//!
//! Question matching is a deliberate heuristic (normalized-key equality,
//! see [`aggregate`]), so the edge is a signal to investigate, not an
//! executable guarantee.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`category`]: Keyword-based question categorization
//! - [`market`]: Common market data model
//! - [`providers`]: Per-venue fetchers and normalizers
//! - [`aggregate`]: Cross-venue question grouping
//! - [`arbitrage`]: Opportunity detection
//! - [`pipeline`]: One refresh cycle, fetch to snapshot
//! - [`api`]: HTTP API serving the aggregated views
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod aggregate;
pub mod api;
pub mod arbitrage;
pub mod category;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod pipeline;
pub mod providers;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
