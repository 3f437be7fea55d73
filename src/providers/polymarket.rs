//! Polymarket CLOB payload model and normalizer.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::category::categorize;
use crate::market::{Market, Source};

/// Polymarket event page base URL.
const POLYMARKET_EVENT_URL: &str = "https://polymarket.com/event";

/// One market from the CLOB `/markets` listing.
///
/// The listing is inconsistent about where outcome prices live (`outcomes`
/// on older records, `tokens` on newer ones) and about whether numbers are
/// serialized as JSON numbers or strings, so every field is optional and
/// prices go through [`PriceField`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClobMarket {
    /// Condition id, the provider-local identifier.
    pub condition_id: String,
    /// Market question text.
    pub question: Option<String>,
    /// Outcome entries with prices (older listing shape).
    #[serde(default)]
    pub outcomes: Option<Vec<OutcomeEntry>>,
    /// Token entries with prices (newer listing shape).
    #[serde(default)]
    pub tokens: Option<Vec<OutcomeEntry>>,
    /// Total volume, if reported.
    #[serde(default)]
    pub volume: Option<PriceField>,
    /// ISO close timestamp.
    #[serde(default)]
    pub end_date_iso: Option<String>,
}

/// A single outcome/token entry carrying a price.
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeEntry {
    /// Price of this outcome.
    #[serde(default)]
    pub price: Option<PriceField>,
}

/// Numeric field that the API serializes as either a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    /// JSON number form.
    Num(f64),
    /// Stringified number form.
    Text(String),
}

impl PriceField {
    /// Convert to a `Decimal`, `None` if unparseable.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            PriceField::Num(n) => Decimal::from_f64(*n),
            PriceField::Text(s) => s.parse().ok(),
        }
    }
}

/// Normalize a CLOB markets listing into common `Market` records.
///
/// The first two outcome entries are read as YES and NO respectively. A
/// market exposing no price entries gets the neutral 0.5/0.5 prior, a
/// stand-in rather than a real market read.
pub fn normalize(markets: Vec<ClobMarket>) -> Vec<Market> {
    markets.into_iter().filter_map(normalize_one).collect()
}

fn normalize_one(raw: ClobMarket) -> Option<Market> {
    let neutral = Decimal::new(5, 1); // 0.5

    let yes_odds = price_at(&raw, 0).unwrap_or(neutral);
    let no_odds = price_at(&raw, 1).unwrap_or(neutral);
    let volume = raw
        .volume
        .as_ref()
        .and_then(PriceField::to_decimal)
        .unwrap_or(Decimal::ZERO);

    let question = raw.question.filter(|q| !q.is_empty())?;

    Some(Market {
        id: format!("{}{}", Source::Polymarket.id_prefix(), raw.condition_id),
        category: categorize(&question),
        source: Source::Polymarket,
        yes_odds,
        no_odds,
        volume: Some(volume),
        url: format!("{}/{}", POLYMARKET_EVENT_URL, raw.condition_id),
        end_date: raw.end_date_iso,
        question,
    })
}

/// Price of the `idx`-th outcome, preferring `outcomes` over `tokens`.
fn price_at(raw: &ClobMarket, idx: usize) -> Option<Decimal> {
    let from = |entries: &Option<Vec<OutcomeEntry>>| {
        entries
            .as_ref()
            .and_then(|e| e.get(idx))
            .and_then(|e| e.price.as_ref())
            .and_then(PriceField::to_decimal)
    };

    from(&raw.outcomes).or_else(|| from(&raw.tokens))
}
