//! Unified error types for the aggregator.

use thiserror::Error;

use crate::market::Source;

/// Unified error type for the aggregator.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Provider fetch/parse error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while fetching or decoding a single provider feed.
///
/// These never escape the fetch boundary during a refresh cycle: the
/// caller logs them and substitutes an empty market list, so one venue
/// being down degrades that venue to zero markets instead of aborting
/// the cycle.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider returned a non-success HTTP status.
    #[error("{provider} returned HTTP {status}")]
    BadStatus {
        /// The provider that failed.
        provider: Source,
        /// The HTTP status code.
        status: u16,
    },

    /// Transport-level failure reaching the provider.
    #[error("failed to fetch {provider}: {reason}")]
    Fetch {
        /// The provider that failed.
        provider: Source,
        /// Reason for failure.
        reason: String,
    },

    /// Provider payload did not decode into the expected shape.
    #[error("failed to parse {provider} payload: {reason}")]
    Parse {
        /// The provider whose payload failed to decode.
        provider: Source,
        /// Reason for failure.
        reason: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
