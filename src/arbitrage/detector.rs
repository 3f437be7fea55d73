//! Arbitrage opportunity detection over aggregated questions.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::category::Category;
use crate::market::{AggregatedQuestion, Source, SourceQuote};

/// A pricing inconsistency on one aggregated question.
///
/// The YES and NO legs are selected independently, so both may come from
/// the same venue; in that case the figure is that venue's own spread
/// inefficiency rather than a cross-venue arbitrage. Recomputed from
/// scratch every refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageOpportunity {
    /// Display text of the question.
    pub question: String,
    /// Topical tag of the question.
    pub category: Category,
    /// Venue quoting the best YES price.
    pub yes_source: Source,
    /// Best YES price across venues.
    pub yes_odds: Decimal,
    /// Venue quoting the best NO price.
    pub no_source: Source,
    /// Best NO price across venues.
    pub no_odds: Decimal,
    /// Combined implied probability, `yes_odds + no_odds`.
    pub implied_prob: Decimal,
    /// Percentage short of certainty, `(1 - implied_prob) * 100`.
    pub edge: Decimal,
    /// All quotes of the underlying group, for display.
    pub sources: BTreeMap<Source, SourceQuote>,
}

/// Scan aggregated questions for opportunities, best edge first.
///
/// Only groups quoted by at least two venues are considered. The sort is
/// stable, so equal edges keep their group order.
pub fn detect_arbitrage(
    groups: &[AggregatedQuestion],
    threshold: Decimal,
) -> Vec<ArbitrageOpportunity> {
    let mut opportunities: Vec<ArbitrageOpportunity> = groups
        .iter()
        .filter_map(|group| check_group(group, threshold))
        .collect();

    opportunities.sort_by(|a, b| b.edge.cmp(&a.edge));

    debug!(
        groups = groups.len(),
        opportunities = opportunities.len(),
        "Arbitrage scan complete"
    );

    opportunities
}

/// Check one group: best YES and best NO independently, strict `>` so the
/// first maximal quote in venue order wins ties.
///
/// A price of exactly zero is a dead side, not a quote, and is never
/// selected; a group whose side has no positive quote is skipped.
fn check_group(group: &AggregatedQuestion, threshold: Decimal) -> Option<ArbitrageOpportunity> {
    if group.source_count() < 2 {
        return None;
    }

    let mut best_yes: Option<(Source, Decimal)> = None;
    let mut best_no: Option<(Source, Decimal)> = None;

    for (&source, quote) in &group.sources {
        if quote.yes_odds > Decimal::ZERO
            && best_yes.map_or(true, |(_, odds)| quote.yes_odds > odds)
        {
            best_yes = Some((source, quote.yes_odds));
        }
        if quote.no_odds > Decimal::ZERO && best_no.map_or(true, |(_, odds)| quote.no_odds > odds)
        {
            best_no = Some((source, quote.no_odds));
        }
    }

    let (yes_source, yes_odds) = best_yes?;
    let (no_source, no_odds) = best_no?;

    let implied_prob = yes_odds + no_odds;
    if implied_prob >= threshold {
        return None;
    }

    Some(ArbitrageOpportunity {
        question: group.question.clone(),
        category: group.category,
        yes_source,
        yes_odds,
        no_source,
        no_odds,
        implied_prob,
        edge: (Decimal::ONE - implied_prob) * Decimal::ONE_HUNDRED,
        sources: group.sources.clone(),
    })
}
