//! API Routes
//!
//! Configures the Axum router with the cache administration endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_overview_handler, cache_test_clear_handler, cache_test_handler,
    cache_test_manual_handler, clear_all_handler, clear_checkout_sessions_handler,
    delete_checkout_handler, get_checkout_handler, health_handler, invalidate_key_handler,
    invalidate_order_handler, invalidate_pattern_handler, invalidate_products_handler,
    put_checkout_handler, reset_stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /admin/cache` - Entry count, keys and hit/miss statistics
/// - `DELETE /admin/cache` - Clear every cache
/// - `POST /admin/cache/invalidate` - Invalidate keys matching a pattern
/// - `DELETE /admin/cache/keys/:key` - Invalidate one key
/// - `DELETE /admin/cache/checkout-sessions` - Invalidate all checkout sessions
/// - `DELETE /admin/cache/products` - Invalidate product listings and products
/// - `DELETE /admin/cache/orders/:order_id` - Invalidate one cached order
/// - `POST /admin/cache/stats/reset` - Reset hit/miss counters
/// - `GET|DELETE /cache-test`, `POST /cache-test/manual` - Cache-aside demo
/// - `GET|PUT|DELETE /sessions/:session_id/checkout` - Session-scoped checkout state
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/admin/cache",
            get(cache_overview_handler).delete(clear_all_handler),
        )
        .route("/admin/cache/invalidate", post(invalidate_pattern_handler))
        .route("/admin/cache/keys/:key", delete(invalidate_key_handler))
        .route(
            "/admin/cache/checkout-sessions",
            delete(clear_checkout_sessions_handler),
        )
        .route("/admin/cache/products", delete(invalidate_products_handler))
        .route(
            "/admin/cache/orders/:order_id",
            delete(invalidate_order_handler),
        )
        .route("/admin/cache/stats/reset", post(reset_stats_handler))
        .route(
            "/cache-test",
            get(cache_test_handler).delete(cache_test_clear_handler),
        )
        .route("/cache-test/manual", post(cache_test_manual_handler))
        .route(
            "/sessions/:session_id/checkout",
            get(get_checkout_handler)
                .put(put_checkout_handler)
                .delete(delete_checkout_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
