//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (nosniff, frame denial, no-store)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Rate limiting (governor, write endpoints only)
//!
//! Extractors for route handlers live here too: [`SessionCart`],
//! [`SessionWishlist`] and [`ValidatedJson`].

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod shopper;
pub mod validated_json;

pub use rate_limit::{
    RateLimiterLayer, api_rate_limiter, checkout_rate_limiter, rate_limited_json,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use shopper::{SessionCart, SessionWishlist, clear_cart};
pub use validated_json::ValidatedJson;
