//! HTTP API module serving the aggregated views to the renderer.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
