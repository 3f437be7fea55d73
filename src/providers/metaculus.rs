//! Metaculus questions payload model and normalizer.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::category::categorize;
use crate::market::{Market, Source};

/// Metaculus question page base URL.
const METACULUS_QUESTION_URL: &str = "https://www.metaculus.com/questions";

/// Paged response from the questions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsPage {
    /// Questions on this page.
    #[serde(default)]
    pub results: Vec<ApiQuestion>,
}

/// One question as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiQuestion {
    /// Question id, the provider-local identifier.
    pub id: u64,
    /// Question title text.
    pub title: Option<String>,
    /// Question type; only `"binary"` maps onto a yes/no quote.
    #[serde(default)]
    pub possibility_type: Option<String>,
    /// Aggregated community forecast.
    #[serde(default)]
    pub community_prediction: Option<CommunityPrediction>,
    /// Scheduled resolution timestamp.
    #[serde(default)]
    pub resolve_time: Option<String>,
}

/// Community forecast summary.
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityPrediction {
    /// Distribution summary of the full forecast.
    #[serde(default)]
    pub full: Option<PredictionQuartiles>,
    /// Mean forecast, fallback when quartiles are absent.
    #[serde(default)]
    pub mean: Option<f64>,
}

/// Quartiles of the community distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionQuartiles {
    /// Median (second quartile).
    #[serde(default)]
    pub q2: Option<f64>,
}

/// Normalize a questions page into common `Market` records.
///
/// Metaculus quotes a single community probability, so `yes = p` and
/// `no = 1 - p`. Non-binary questions carry no such probability and are
/// dropped. Metaculus has no trade volume.
pub fn normalize(page: QuestionsPage) -> Vec<Market> {
    page.results.into_iter().filter_map(normalize_one).collect()
}

fn normalize_one(raw: ApiQuestion) -> Option<Market> {
    if raw.possibility_type.as_deref() != Some("binary") {
        return None;
    }

    let question = raw.title.filter(|t| !t.is_empty())?;
    let prob = community_probability(raw.community_prediction.as_ref());

    Some(Market {
        id: format!("{}{}", Source::Metaculus.id_prefix(), raw.id),
        category: categorize(&question),
        source: Source::Metaculus,
        yes_odds: prob,
        no_odds: Decimal::ONE - prob,
        volume: None,
        url: format!("{}/{}", METACULUS_QUESTION_URL, raw.id),
        end_date: raw.resolve_time,
        question,
    })
}

/// Median of the community forecast, falling back to the mean, falling
/// back to the neutral prior.
fn community_probability(prediction: Option<&CommunityPrediction>) -> Decimal {
    prediction
        .and_then(|p| {
            p.full
                .as_ref()
                .and_then(|f| f.q2)
                .or(p.mean)
                .and_then(Decimal::from_f64)
        })
        .unwrap_or_else(|| Decimal::new(5, 1))
}
