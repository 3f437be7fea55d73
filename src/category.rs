//! Keyword-based question categorization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Topical tag derived from a question's text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    /// Elections, officeholders, legislation.
    Politics,
    /// Coins and crypto ecosystems.
    Crypto,
    /// Leagues, tournaments, matches.
    Sports,
    /// AI and big-tech companies.
    Tech,
    /// Everything else.
    Other,
}

const POLITICS_KEYWORDS: &[&str] = &["trump", "biden", "election", "president", "congress"];
const CRYPTO_KEYWORDS: &[&str] = &["bitcoin", "ethereum", "crypto", "btc", "eth"];
const SPORTS_KEYWORDS: &[&str] = &["nfl", "nba", "world cup", "championship", "game"];
const TECH_KEYWORDS: &[&str] = &["ai", "openai", "google", "apple", "tech"];

/// Map a question to a category by case-insensitive keyword match.
///
/// Keyword sets are checked in a fixed priority order (politics, crypto,
/// sports, tech); the first set with a matching keyword wins.
pub fn categorize(question: &str) -> Category {
    let q = question.to_lowercase();

    let matches = |keywords: &[&str]| keywords.iter().any(|k| q.contains(k));

    if matches(POLITICS_KEYWORDS) {
        Category::Politics
    } else if matches(CRYPTO_KEYWORDS) {
        Category::Crypto
    } else if matches(SPORTS_KEYWORDS) {
        Category::Sports
    } else if matches(TECH_KEYWORDS) {
        Category::Tech
    } else {
        Category::Other
    }
}
