//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{arbitrage, health, markets, ready, render_metrics, stats, AppState};

/// Create the API router.
///
/// CORS is permissive: the consumer is a static browser page, which is
/// the whole reason the original data path needed a relay.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // View endpoints
        .route("/api/v1/markets", get(markets))
        .route("/api/v1/arbitrage", get(arbitrage))
        .route("/api/v1/stats", get(stats))
        // Metrics endpoint
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use crate::pipeline::Snapshot;

    fn test_state() -> AppState {
        AppState::new(PrometheusBuilder::new().build_recorder().handle())
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_before_first_cycle() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_after_publish() {
        let state = test_state();
        state.publish(Snapshot::empty()).await;
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn markets_endpoint_accepts_filters() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/markets?search=bitcoin&category=crypto")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn arbitrage_and_stats_endpoints_respond() {
        let state = test_state();
        let app = create_router(state);

        for uri in ["/api/v1/arbitrage", "/api/v1/stats", "/metrics"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "endpoint {uri}");
        }
    }
}
