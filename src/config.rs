//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Refresh Cycle ===
    /// Milliseconds between refresh cycles.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Combined-probability ceiling below which an opportunity is flagged.
    #[serde(default = "default_arb_threshold")]
    pub arb_threshold: Decimal,

    /// Maximum markets taken per provider per cycle.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    // === Provider Endpoints ===
    /// Polymarket CLOB markets endpoint.
    #[serde(default = "default_polymarket_api_url")]
    pub polymarket_api_url: String,

    /// Metaculus questions endpoint.
    #[serde(default = "default_metaculus_api_url")]
    pub metaculus_api_url: String,

    /// Manifold markets endpoint.
    #[serde(default = "default_manifold_api_url")]
    pub manifold_api_url: String,

    /// Relay prefix the request URL is percent-encoded into, e.g.
    /// `https://corsproxy.io/?`. Empty means direct requests.
    #[serde(default)]
    pub relay_url: String,

    // === HTTP Client ===
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Server Configuration ===
    /// HTTP server port for the view/health endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_refresh_interval_ms() -> u64 {
    60_000 // 1 minute
}

fn default_arb_threshold() -> Decimal {
    Decimal::new(98, 2) // 0.98
}

fn default_page_limit() -> usize {
    50
}

fn default_polymarket_api_url() -> String {
    "https://clob.polymarket.com/markets".to_string()
}

fn default_metaculus_api_url() -> String {
    "https://www.metaculus.com/api2/questions/".to_string()
}

fn default_manifold_api_url() -> String {
    "https://api.manifold.markets/v0/markets".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.arb_threshold <= Decimal::ZERO || self.arb_threshold > Decimal::ONE {
            return Err("ARB_THRESHOLD must be in (0, 1]".to_string());
        }

        if self.page_limit == 0 {
            return Err("PAGE_LIMIT must be at least 1".to_string());
        }

        if self.refresh_interval_ms < 1_000 {
            return Err("REFRESH_INTERVAL_MS must be at least 1000".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be nonzero".to_string());
        }

        Ok(())
    }

    /// Whether provider requests are routed through a relay prefix.
    pub fn uses_relay(&self) -> bool {
        !self.relay_url.is_empty()
    }
}
