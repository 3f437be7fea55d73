//! Cross-venue question grouping.
//!
//! Two questions are considered the same iff their derived match keys are
//! byte-identical. The key derivation sits behind [`MatchStrategy`] so a
//! fuzzier matcher can be swapped in without touching the grouping fold.

use std::collections::HashMap;

use crate::market::{AggregatedQuestion, Market, SourceQuote};

/// Keys are capped at this many characters, so punctuation-only
/// differences past the cap cannot split a group.
const QUESTION_KEY_LEN: usize = 50;

/// Strategy deriving the key under which equivalent questions collide.
pub trait MatchStrategy {
    /// Derive the group key for a question text.
    fn key(&self, question: &str) -> String;
}

/// Default strategy: lowercase, keep only ASCII letters and digits,
/// truncate to the first 50 characters.
///
/// Paraphrases and reworded questions do NOT collide under this key; the
/// false-negative rate is accepted in exchange for O(n) grouping with no
/// text-similarity dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumKey;

impl MatchStrategy for AlphanumKey {
    fn key(&self, question: &str) -> String {
        question
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .take(QUESTION_KEY_LEN)
            .collect()
    }
}

/// Group markets into cross-venue questions with the default key.
pub fn aggregate(markets: &[Market]) -> Vec<AggregatedQuestion> {
    aggregate_with(&AlphanumKey, markets)
}

/// Group markets into cross-venue questions under the given strategy.
///
/// Folds the stream in order: the first market with a new key creates the
/// group (and fixes its output position), and every market upserts its
/// venue's quote, so the last record a venue contributes to a group wins.
pub fn aggregate_with(
    strategy: &impl MatchStrategy,
    markets: &[Market],
) -> Vec<AggregatedQuestion> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AggregatedQuestion> = Vec::new();

    for market in markets {
        let key = strategy.key(&market.question);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(AggregatedQuestion::seeded_from(market));
            groups.len() - 1
        });
        groups[slot]
            .sources
            .insert(market.source, SourceQuote::from(market));
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::market::Source;
    use pretty_assertions::{assert_eq, assert_ne};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn market(source: Source, question: &str, yes: Decimal, no: Decimal) -> Market {
        Market {
            id: format!("{}{}", source.id_prefix(), question.len()),
            question: question.to_string(),
            source,
            category: Category::Crypto,
            yes_odds: yes,
            no_odds: no,
            volume: Some(Decimal::ZERO),
            url: format!("https://example.com/{}", source),
            end_date: None,
        }
    }

    #[test]
    fn key_strips_case_and_punctuation() {
        let key = AlphanumKey;
        assert_eq!(
            key.key("Will Bitcoin hit $100k by 2025?"),
            key.key("will bitcoin hit $100k by 2025")
        );
        assert_eq!(key.key("Will Bitcoin hit $100k?"), "willbitcoinhit100k");
    }

    #[test]
    fn key_truncates_to_fifty_chars() {
        let long = "a".repeat(80);
        assert_eq!(AlphanumKey.key(&long).len(), 50);
    }

    #[test]
    fn reworded_questions_do_not_collide() {
        let key = AlphanumKey;
        assert_ne!(
            key.key("Will Bitcoin hit $100k by 2025?"),
            key.key("Will Bitcoin reach 100k in 2025")
        );
    }

    #[test]
    fn merges_equivalent_questions_across_venues() {
        let markets = vec![
            market(
                Source::Polymarket,
                "Will Bitcoin hit $100k by 2025?",
                dec!(0.55),
                dec!(0.47),
            ),
            market(
                Source::Manifold,
                "will bitcoin hit $100k by 2025",
                dec!(0.52),
                dec!(0.48),
            ),
        ];

        let groups = aggregate(&markets);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].source_count(), 2);
        // Seeded from the first market in stream order
        assert_eq!(groups[0].question, "Will Bitcoin hit $100k by 2025?");
        assert_eq!(groups[0].sources[&Source::Manifold].yes_odds, dec!(0.52));
    }

    #[test]
    fn output_keeps_first_seen_order() {
        let markets = vec![
            market(Source::Polymarket, "Question B", dec!(0.5), dec!(0.5)),
            market(Source::Polymarket, "Question A", dec!(0.5), dec!(0.5)),
            market(Source::Manifold, "question b", dec!(0.5), dec!(0.5)),
        ];

        let groups = aggregate(&markets);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].question, "Question B");
        assert_eq!(groups[1].question, "Question A");
    }

    #[test]
    fn last_quote_from_a_venue_wins() {
        let markets = vec![
            market(Source::Manifold, "Question A", dec!(0.4), dec!(0.6)),
            market(Source::Manifold, "question a!", dec!(0.7), dec!(0.3)),
        ];

        let groups = aggregate(&markets);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].source_count(), 1);
        assert_eq!(groups[0].sources[&Source::Manifold].yes_odds, dec!(0.7));
    }

    #[test]
    fn quotes_round_trip_to_input_markets() {
        let markets = vec![
            market(Source::Polymarket, "Question A", dec!(0.61), dec!(0.42)),
            market(Source::Metaculus, "question a", dec!(0.58), dec!(0.42)),
            market(Source::Manifold, "Question B", dec!(0.2), dec!(0.8)),
        ];

        let groups = aggregate(&markets);

        for group in &groups {
            for (source, quote) in &group.sources {
                assert!(markets.iter().any(|m| m.source == *source
                    && m.yes_odds == quote.yes_odds
                    && m.no_odds == quote.no_odds));
            }
        }
    }
}
