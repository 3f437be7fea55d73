//! Market types shared by normalizers, aggregation and detection.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::category::Category;

/// A prediction-market data provider.
///
/// `Ord` fixes a deterministic venue order (declaration order) used when
/// scanning an aggregated group's quotes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum Source {
    /// Polymarket CLOB (discrete outcome prices).
    Polymarket,
    /// Metaculus (community forecast, no order book).
    Metaculus,
    /// Manifold (single resolution probability).
    Manifold,
}

impl Source {
    /// Short tag prefixed onto provider-local ids for global uniqueness.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Source::Polymarket => "poly_",
            Source::Metaculus => "meta_",
            Source::Manifold => "mani_",
        }
    }
}

/// One binary question as quoted by one provider, post-normalization.
///
/// `yes_odds` and `no_odds` are independently sourced implied
/// probabilities; a venue's pair is not required to sum to 1 (venues carry
/// their own spread and rounding). Records whose odds could not be derived
/// never leave the normalizer.
#[derive(Debug, Clone, Serialize)]
pub struct Market {
    /// Globally unique id, `{prefix}{provider-local id}`.
    pub id: String,
    /// Display text of the question.
    pub question: String,
    /// The venue that quoted this record.
    pub source: Source,
    /// Topical tag derived from the question text.
    pub category: Category,
    /// Implied probability of YES, in `[0, 1]`.
    pub yes_odds: Decimal,
    /// Implied probability of NO, in `[0, 1]`.
    pub no_odds: Decimal,
    /// Trade volume where the venue reports one; informational only.
    pub volume: Option<Decimal>,
    /// Canonical link to the market on its venue.
    pub url: String,
    /// Venue-reported resolution/close timestamp, kept opaque.
    pub end_date: Option<String>,
}

/// One venue's prices inside an aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceQuote {
    /// Implied probability of YES.
    pub yes_odds: Decimal,
    /// Implied probability of NO.
    pub no_odds: Decimal,
    /// Link to the market on this venue.
    pub url: String,
    /// Venue-reported volume, if any.
    pub volume: Option<Decimal>,
}

impl From<&Market> for SourceQuote {
    fn from(market: &Market) -> Self {
        Self {
            yes_odds: market.yes_odds,
            no_odds: market.no_odds,
            url: market.url.clone(),
            volume: market.volume,
        }
    }
}

/// A group of equivalent questions across venues.
///
/// Question text, category and end date come from the first market folded
/// into the group. `sources` holds at most one quote per venue; a later
/// record from the same venue overwrites the earlier one.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedQuestion {
    /// Display text from the first contributing market.
    pub question: String,
    /// Category from the first contributing market.
    pub category: Category,
    /// End date from the first contributing market.
    pub end_date: Option<String>,
    /// Per-venue quotes, keyed and iterated in `Source` order.
    pub sources: BTreeMap<Source, SourceQuote>,
}

impl AggregatedQuestion {
    /// Seed a new group from its first market.
    pub fn seeded_from(market: &Market) -> Self {
        Self {
            question: market.question.clone(),
            category: market.category,
            end_date: market.end_date.clone(),
            sources: BTreeMap::new(),
        }
    }

    /// Number of venues quoting this question.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
