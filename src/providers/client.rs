//! Provider fetch client.
//!
//! The refresh cycle's only contact with the network. Each provider fetch
//! builds its request URL (optionally routed through a relay prefix),
//! decodes the payload, and hands it to the provider's normalizer. All
//! three fetches run concurrently and the cycle waits for every one of
//! them; a failed provider degrades to zero markets instead of failing
//! the join.

use std::time::{Duration, Instant};

use futures::future;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{manifold, metaculus, polymarket};
use crate::config::Config;
use crate::error::ProviderError;
use crate::market::{Market, Source};
use crate::metrics;

/// HTTP client over the configured provider endpoints.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    /// Pooled HTTP client shared by all provider fetches.
    http: reqwest::Client,
    /// Relay prefix, empty for direct requests.
    relay_url: String,
    /// Maximum markets taken per provider.
    page_limit: usize,
    /// Polymarket CLOB markets endpoint.
    polymarket_url: String,
    /// Metaculus questions endpoint.
    metaculus_url: String,
    /// Manifold markets endpoint.
    manifold_url: String,
}

impl ProviderClient {
    /// Create a client from config with pooled HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(2_000))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("dissonance/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            relay_url: config.relay_url.clone(),
            page_limit: config.page_limit,
            polymarket_url: config.polymarket_api_url.clone(),
            metaculus_url: config.metaculus_api_url.clone(),
            manifold_url: config.manifold_api_url.clone(),
        }
    }

    /// Fetch and normalize all providers, tolerating individual failures.
    ///
    /// Results concatenate in fixed `Source` order. Failures are logged
    /// and contribute zero markets; this function itself never fails.
    pub async fn fetch_all(&self) -> Vec<Market> {
        let (poly, meta, mani) = future::join3(
            self.fetch_polymarket(),
            self.fetch_metaculus(),
            self.fetch_manifold(),
        )
        .await;

        let mut markets = Vec::new();
        let batches = [
            (Source::Polymarket, poly),
            (Source::Metaculus, meta),
            (Source::Manifold, mani),
        ];

        for (source, result) in batches {
            match result {
                Ok(mut batch) => {
                    metrics::inc_markets_fetched(source, batch.len());
                    info!(source = %source, count = batch.len(), "Fetched markets");
                    markets.append(&mut batch);
                }
                Err(e) => {
                    warn!(
                        source = %source,
                        error = %e,
                        "Provider fetch failed, continuing with zero markets"
                    );
                }
            }
        }

        markets
    }

    /// Fetch Polymarket's CLOB markets listing.
    ///
    /// The endpoint takes no page parameter; the listing is truncated
    /// client-side to the page limit.
    #[instrument(skip(self))]
    pub async fn fetch_polymarket(&self) -> Result<Vec<Market>, ProviderError> {
        let url = self.request_url(Source::Polymarket, &self.polymarket_url, &[])?;
        let start = Instant::now();

        let raw: Vec<polymarket::ClobMarket> = self.get_json(Source::Polymarket, &url).await?;
        metrics::record_provider_fetch_latency(start, Source::Polymarket);

        let page: Vec<_> = raw.into_iter().take(self.page_limit).collect();
        let markets = polymarket::normalize(page);
        debug!(count = markets.len(), "Normalized Polymarket markets");
        Ok(markets)
    }

    /// Fetch open Metaculus questions.
    #[instrument(skip(self))]
    pub async fn fetch_metaculus(&self) -> Result<Vec<Market>, ProviderError> {
        let limit = self.page_limit.to_string();
        let url = self.request_url(
            Source::Metaculus,
            &self.metaculus_url,
            &[("limit", limit.as_str()), ("status", "open")],
        )?;
        let start = Instant::now();

        let page: metaculus::QuestionsPage = self.get_json(Source::Metaculus, &url).await?;
        metrics::record_provider_fetch_latency(start, Source::Metaculus);

        let markets = metaculus::normalize(page);
        debug!(count = markets.len(), "Normalized Metaculus markets");
        Ok(markets)
    }

    /// Fetch Manifold's markets listing.
    #[instrument(skip(self))]
    pub async fn fetch_manifold(&self) -> Result<Vec<Market>, ProviderError> {
        let limit = self.page_limit.to_string();
        let url = self.request_url(
            Source::Manifold,
            &self.manifold_url,
            &[("limit", limit.as_str())],
        )?;
        let start = Instant::now();

        let raw: Vec<manifold::ApiMarket> = self.get_json(Source::Manifold, &url).await?;
        metrics::record_provider_fetch_latency(start, Source::Manifold);

        let markets = manifold::normalize(raw);
        debug!(count = markets.len(), "Normalized Manifold markets");
        Ok(markets)
    }

    /// Build the request URL for a provider endpoint, wrapping it in the
    /// relay prefix (URL percent-encoded into the relay query) when one is
    /// configured.
    fn request_url(
        &self,
        source: Source,
        api_url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ProviderError> {
        let mut url = Url::parse(api_url).map_err(|e| ProviderError::Fetch {
            provider: source,
            reason: format!("invalid endpoint url: {e}"),
        })?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        if self.relay_url.is_empty() {
            return Ok(url.into());
        }

        let encoded: String = url::form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
        Ok(format!("{}{}", self.relay_url, encoded))
    }

    /// GET a URL and decode the JSON body, mapping failures onto the
    /// provider error taxonomy.
    async fn get_json<T: DeserializeOwned>(
        &self,
        source: Source,
        url: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Fetch {
                provider: source,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::BadStatus {
                provider: source,
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|e| ProviderError::Parse {
            provider: source,
            reason: e.to_string(),
        })
    }
}
