//! HTTP API routes and handlers.
//!
//! - `health` - Service health checks
//! - `wifi` - Network records and QR code downloads
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub mod error;
pub mod health;
pub mod openapi;
pub mod wifi;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use openapi::get_openapi_json;

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                  - Health check
/// /api
/// ├── /wifi                - List (GET) and create (POST) networks
/// ├── /wifi/{id}           - Fetch one network
/// ├── /wifi/{id}/qr        - PNG QR code for one network
/// ├── /wifi/bulk-qr        - Zip of QR codes for several networks
/// └── /openapi.json        - OpenAPI specification
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                .route("/openapi.json", get(openapi::get_openapi_spec))
                .nest("/wifi", wifi::router()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
