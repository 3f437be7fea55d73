//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::arbitrage::ArbitrageOpportunity;
use crate::category::Category;
use crate::market::AggregatedQuestion;
use crate::pipeline::{filter_markets, Snapshot, SummaryStats};

/// How many opportunities the arbitrage view hands to the renderer.
const ARBITRAGE_VIEW_LIMIT: usize = 10;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether at least one refresh cycle has landed.
    pub ready: Arc<AtomicBool>,
    /// Latest snapshot, last cycle wins.
    pub snapshot: Arc<tokio::sync::RwLock<Snapshot>>,
    /// Prometheus render handle.
    metrics: PrometheusHandle,
}

impl AppState {
    /// Create new app state around a Prometheus handle.
    pub fn new(metrics: PrometheusHandle) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            snapshot: Arc::new(tokio::sync::RwLock::new(Snapshot::empty())),
            metrics,
        }
    }

    /// Publish a fresh snapshot and mark the service ready.
    pub async fn publish(&self, snapshot: Snapshot) {
        *self.snapshot.write().await = snapshot;
        self.set_ready(true);
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether a snapshot is available.
    pub ready: bool,
    /// When the latest snapshot was taken, if any.
    pub refreshed_at: Option<String>,
}

/// Query parameters of the markets view.
#[derive(Debug, Default, Deserialize)]
pub struct MarketsQuery {
    /// Case-insensitive substring to match against question text.
    pub search: Option<String>,
    /// Exact category filter.
    pub category: Option<Category>,
}

/// Markets view response.
#[derive(Debug, Serialize)]
pub struct MarketsResponse {
    /// Number of questions after filtering.
    pub count: usize,
    /// The filtered questions.
    pub markets: Vec<AggregatedQuestion>,
}

/// Arbitrage view response.
#[derive(Debug, Serialize)]
pub struct ArbitrageResponse {
    /// Total opportunities this cycle, before the view cut.
    pub total: usize,
    /// Best opportunities, at most [`ARBITRAGE_VIEW_LIMIT`].
    pub opportunities: Vec<ArbitrageOpportunity>,
}

/// Stats bar response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Headline numbers.
    #[serde(flatten)]
    pub stats: SummaryStats,
    /// When the latest snapshot was taken, if any.
    pub refreshed_at: Option<String>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness handler - 200 once the first cycle has landed, 503 before.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let refreshed_at = if is_ready {
        state.snapshot.read().await.fetched_at.format(&Rfc3339).ok()
    } else {
        None
    };

    let response = ReadyResponse {
        ready: is_ready,
        refreshed_at,
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Markets view handler, with optional search/category filtering.
pub async fn markets(
    State(state): State<AppState>,
    Query(query): Query<MarketsQuery>,
) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let filtered: Vec<AggregatedQuestion> =
        filter_markets(&snapshot.markets, query.search.as_deref(), query.category)
            .into_iter()
            .cloned()
            .collect();

    Json(MarketsResponse {
        count: filtered.len(),
        markets: filtered,
    })
}

/// Arbitrage view handler - the best opportunities of the latest cycle.
pub async fn arbitrage(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;

    Json(ArbitrageResponse {
        total: snapshot.opportunities.len(),
        opportunities: snapshot
            .opportunities
            .iter()
            .take(ARBITRAGE_VIEW_LIMIT)
            .cloned()
            .collect(),
    })
}

/// Stats handler - headline numbers for the stats bar.
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let refreshed_at = if state.is_ready() {
        snapshot.fetched_at.format(&Rfc3339).ok()
    } else {
        None
    };

    Json(StatsResponse {
        stats: snapshot.stats(),
        refreshed_at,
    })
}

/// Prometheus metrics handler.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn test_state() -> AppState {
        AppState::new(PrometheusBuilder::new().build_recorder().handle())
    }

    #[test]
    fn app_state_ready_toggle() {
        let state = test_state();
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[tokio::test]
    async fn publish_stores_snapshot_and_sets_ready() {
        let state = test_state();
        state.publish(Snapshot::empty()).await;

        assert!(state.is_ready());
        assert_eq!(state.snapshot.read().await.markets.len(), 0);
    }
}
