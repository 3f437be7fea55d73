//! One refresh cycle, from provider fetch to snapshot.
//!
//! Everything after the fetch join is a pure, synchronous transformation
//! over the collected market list. A cycle cannot fail: providers degrade
//! to empty individually, and an all-providers-empty cycle is a valid
//! empty snapshot, not an error.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::arbitrage::{detect_arbitrage, ArbitrageOpportunity};
use crate::category::Category;
use crate::config::Config;
use crate::market::AggregatedQuestion;
use crate::metrics;
use crate::providers::ProviderClient;

/// Result of one refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Aggregated questions, first-seen order.
    pub markets: Vec<AggregatedQuestion>,
    /// Opportunities, best edge first.
    pub opportunities: Vec<ArbitrageOpportunity>,
    /// When the cycle ran.
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
}

/// Headline numbers for the stats bar.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    /// Total aggregated questions.
    pub question_count: usize,
    /// Total opportunities detected.
    pub opportunity_count: usize,
    /// Edge of the best opportunity; `None` means markets are efficient
    /// (distinct from `question_count == 0`, which means no data at all).
    pub best_edge: Option<Decimal>,
}

impl Snapshot {
    /// Snapshot before the first cycle has run.
    pub fn empty() -> Self {
        Self {
            markets: Vec::new(),
            opportunities: Vec::new(),
            fetched_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    /// Headline numbers for this snapshot.
    pub fn stats(&self) -> SummaryStats {
        SummaryStats {
            question_count: self.markets.len(),
            opportunity_count: self.opportunities.len(),
            best_edge: self.opportunities.first().map(|o| o.edge),
        }
    }
}

/// Run one full refresh cycle.
///
/// Fetches all providers (tolerating individual failures), groups the
/// combined stream, scans for opportunities, and returns the snapshot.
#[instrument(skip(client, config))]
pub async fn run_cycle(client: &ProviderClient, config: &Config) -> Snapshot {
    let start = Instant::now();

    let raw = client.fetch_all().await;
    let markets = aggregate(&raw);
    let opportunities = detect_arbitrage(&markets, config.arb_threshold);

    metrics::inc_cycles_completed();
    metrics::inc_opportunities_detected(opportunities.len());
    metrics::record_cycle_duration(start);

    info!(
        raw_markets = raw.len(),
        questions = markets.len(),
        opportunities = opportunities.len(),
        "Refresh cycle complete"
    );

    Snapshot {
        markets,
        opportunities,
        fetched_at: OffsetDateTime::now_utc(),
    }
}

/// Filter the markets view by question substring and category.
///
/// The search is case-insensitive; either filter absent means
/// "match everything".
pub fn filter_markets<'a>(
    markets: &'a [AggregatedQuestion],
    search: Option<&str>,
    category: Option<Category>,
) -> Vec<&'a AggregatedQuestion> {
    let needle = search.map(str::to_lowercase);

    markets
        .iter()
        .filter(|m| {
            needle
                .as_deref()
                .map_or(true, |n| m.question.to_lowercase().contains(n))
        })
        .filter(|m| category.map_or(true, |c| m.category == c))
        .collect()
}
