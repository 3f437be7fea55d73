//! Manifold markets payload model and normalizer.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::category::categorize;
use crate::market::{Market, Source};

/// One market as returned by the Manifold API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMarket {
    /// Market id, the provider-local identifier.
    pub id: String,
    /// Market question text.
    pub question: Option<String>,
    /// Resolution probability of YES.
    #[serde(default)]
    pub probability: Option<f64>,
    /// 24-hour trade volume.
    #[serde(default, rename = "volume24Hours")]
    pub volume_24_hours: Option<f64>,
    /// Canonical market URL.
    pub url: Option<String>,
    /// Close timestamp in epoch milliseconds.
    #[serde(default, rename = "closeTime")]
    pub close_time: Option<i64>,
}

/// Normalize a markets listing into common `Market` records.
///
/// Manifold exposes one resolution probability directly, so `yes = p` and
/// `no = 1 - p` with no question-type filter.
pub fn normalize(markets: Vec<ApiMarket>) -> Vec<Market> {
    markets.into_iter().filter_map(normalize_one).collect()
}

fn normalize_one(raw: ApiMarket) -> Option<Market> {
    let question = raw.question.filter(|q| !q.is_empty())?;
    let url = raw.url?;

    let prob = raw
        .probability
        .and_then(Decimal::from_f64)
        .unwrap_or_else(|| Decimal::new(5, 1));
    let volume = raw
        .volume_24_hours
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO);

    Some(Market {
        id: format!("{}{}", Source::Manifold.id_prefix(), raw.id),
        category: categorize(&question),
        source: Source::Manifold,
        yes_odds: prob,
        no_odds: Decimal::ONE - prob,
        volume: Some(volume),
        url,
        end_date: raw.close_time.map(|t| t.to_string()),
        question,
    })
}
