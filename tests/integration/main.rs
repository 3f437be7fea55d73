//! Integration tests for the odds aggregator.
//!
//! The offline tests drive the full pipeline over inline provider payload
//! fixtures; no network access is needed. Tests marked `#[ignore]` hit
//! the real provider APIs. Run those with:
//! `cargo test --test integration -- --ignored`

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use dissonance::aggregate::aggregate;
use dissonance::arbitrage::detect_arbitrage;
use dissonance::category::Category;
use dissonance::config::Config;
use dissonance::market::Market;
use dissonance::pipeline::filter_markets;
use dissonance::providers::{manifold, metaculus, polymarket, ProviderClient};

/// Config with compiled-in defaults, endpoints overridable per test.
fn test_config() -> Config {
    Config {
        refresh_interval_ms: 60_000,
        arb_threshold: dec!(0.98),
        page_limit: 50,
        polymarket_api_url: "https://clob.polymarket.com/markets".to_string(),
        metaculus_api_url: "https://www.metaculus.com/api2/questions/".to_string(),
        manifold_api_url: "https://api.manifold.markets/v0/markets".to_string(),
        relay_url: String::new(),
        http_timeout_ms: 10_000,
        port: 8080,
        rust_log: "info".to_string(),
        verbose: false,
    }
}

/// Normalize one fixture payload per provider and concatenate in
/// provider order, the way a refresh cycle does after its join.
fn fixture_markets() -> Vec<Market> {
    let poly = polymarket::normalize(
        serde_json::from_value(serde_json::json!([
            {
                "condition_id": "0xbtc",
                "question": "Will Bitcoin hit $100k by 2025?",
                "outcomes": [{"price": "0.55"}, {"price": "0.41"}],
                "volume": "25000",
                "end_date_iso": "2025-12-31T00:00:00Z"
            },
            {
                "condition_id": "0xelection",
                "question": "Will Trump win the 2028 election?",
                "tokens": [{"price": 0.44}, {"price": 0.58}]
            }
        ]))
        .expect("polymarket fixture"),
    );

    let meta = metaculus::normalize(
        serde_json::from_value(serde_json::json!({
            "results": [
                {
                    "id": 101,
                    "title": "Will Bitcoin hit $100K by 2025",
                    "possibility_type": "binary",
                    "community_prediction": {"full": {"q2": 0.52}},
                    "resolve_time": "2025-12-31T23:00:00Z"
                },
                {
                    "id": 102,
                    "title": "How many launches will happen in 2026?",
                    "possibility_type": "continuous"
                }
            ]
        }))
        .expect("metaculus fixture"),
    );

    let mani = manifold::normalize(
        serde_json::from_value(serde_json::json!([
            {
                "id": "btc100k",
                "question": "will bitcoin hit $100k by 2025?!",
                "probability": 0.58,
                "volume24Hours": 900.5,
                "url": "https://manifold.markets/q/btc100k",
                "closeTime": 1767139200000i64
            },
            {
                "id": "worldcup",
                "question": "Will Brazil win the World Cup?",
                "probability": 0.22,
                "url": "https://manifold.markets/q/worldcup"
            }
        ]))
        .expect("manifold fixture"),
    );

    let mut markets = Vec::new();
    markets.extend(poly);
    markets.extend(meta);
    markets.extend(mani);
    markets
}

#[test]
fn pipeline_merges_equivalent_questions_across_providers() {
    let markets = fixture_markets();
    // The continuous Metaculus question was dropped at normalization
    assert_eq!(markets.len(), 5);

    let groups = aggregate(&markets);

    // BTC question collapses across all three venues; the other two
    // questions stay singletons, in first-seen order
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].question, "Will Bitcoin hit $100k by 2025?");
    assert_eq!(groups[0].source_count(), 3);
    assert_eq!(groups[0].category, Category::Crypto);
    assert_eq!(groups[1].question, "Will Trump win the 2028 election?");
    assert_eq!(groups[2].question, "Will Brazil win the World Cup?");
}

#[test]
fn aggregated_quotes_trace_back_to_input_markets() {
    let markets = fixture_markets();
    let groups = aggregate(&markets);

    for group in &groups {
        for (source, quote) in &group.sources {
            assert!(
                markets.iter().any(|m| m.source == *source
                    && m.yes_odds == quote.yes_odds
                    && m.no_odds == quote.no_odds
                    && m.url == quote.url),
                "quote from {source} in '{}' has no matching input market",
                group.question
            );
        }
    }
}

#[test]
fn realistic_quotes_yield_the_efficient_markets_state() {
    // A venue quoting a single probability always sums YES + NO to 1, so
    // a best-price scan over a group containing one can never fall below
    // certainty; this fixture ends in the "efficient" state, which must
    // be distinguishable from "no data"
    let groups = aggregate(&fixture_markets());
    let opportunities = detect_arbitrage(&groups, dec!(0.98));

    assert!(opportunities.is_empty());
    assert!(!groups.is_empty());
}

#[test]
fn view_filter_narrows_by_text_and_category() {
    let groups = aggregate(&fixture_markets());

    let bitcoin = filter_markets(&groups, Some("BITCOIN"), None);
    assert_eq!(bitcoin.len(), 1);

    let politics = filter_markets(&groups, None, Some(Category::Politics));
    assert_eq!(politics.len(), 1);
    assert_eq!(politics[0].question, "Will Trump win the 2028 election?");

    let none = filter_markets(&groups, Some("bitcoin"), Some(Category::Politics));
    assert!(none.is_empty());
}

#[tokio::test]
async fn unreachable_providers_degrade_to_an_empty_cycle() {
    // Nothing listens on these ports; every fetch fails at the transport
    // layer and the join must still produce a (valid, empty) result
    let config = Config {
        polymarket_api_url: "http://127.0.0.1:9/markets".to_string(),
        metaculus_api_url: "http://127.0.0.1:9/api2/questions/".to_string(),
        manifold_api_url: "http://127.0.0.1:9/v0/markets".to_string(),
        http_timeout_ms: 2_000,
        ..test_config()
    };

    let client = ProviderClient::new(&config);
    let markets = client.fetch_all().await;

    assert!(markets.is_empty());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn live_polymarket_fetch_normalizes() {
    let client = ProviderClient::new(&test_config());

    match client.fetch_polymarket().await {
        Ok(markets) => {
            println!("Polymarket: {} markets", markets.len());
            for m in markets.iter().take(3) {
                println!("  [{}] {} Y:{} N:{}", m.category, m.question, m.yes_odds, m.no_odds);
            }
            assert!(markets.iter().all(|m| m.id.starts_with("poly_")));
        }
        Err(e) => println!("Polymarket fetch failed (acceptable for live test): {e}"),
    }
}

#[tokio::test]
#[ignore = "requires network access"]
async fn live_metaculus_fetch_keeps_binary_only() {
    let client = ProviderClient::new(&test_config());

    match client.fetch_metaculus().await {
        Ok(markets) => {
            println!("Metaculus: {} binary questions", markets.len());
            assert!(markets.iter().all(|m| m.id.starts_with("meta_")));
            assert!(markets.iter().all(|m| m.volume.is_none()));
        }
        Err(e) => println!("Metaculus fetch failed (acceptable for live test): {e}"),
    }
}

#[tokio::test]
#[ignore = "requires network access"]
async fn live_manifold_fetch_normalizes() {
    let client = ProviderClient::new(&test_config());

    match client.fetch_manifold().await {
        Ok(markets) => {
            println!("Manifold: {} markets", markets.len());
            assert!(markets.iter().all(|m| m.id.starts_with("mani_")));
        }
        Err(e) => println!("Manifold fetch failed (acceptable for live test): {e}"),
    }
}
