//! Güzel storefront library.
//!
//! JSON API for the shop: catalog browsing, session cart and wishlist,
//! promo codes, checkout through Allpay, payment webhooks and order lookup.
//! The binary in `main.rs` only adds configuration loading, telemetry and the
//! listener; everything else lives here so it can be tested in-process.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod orders;
pub mod payments;
pub mod routes;
pub mod state;

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;

pub use config::StorefrontConfig;
pub use error::AppError;
pub use state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let rate_limit = state.config().rate_limit;

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(rate_limit))
        .layer(session_layer)
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
