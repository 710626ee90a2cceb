//! API Handlers
//!
//! HTTP request handlers for the cache administration endpoints and the
//! cache-aside demo.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::cache::keys::{CHECKOUT_PREFIX, USER_SESSION_PREFIX};
use crate::cache::{
    Cache, CacheRegistry, CacheStats, OrderCache, ProductCache, SessionCache,
    ShippingMethodsCache,
};
use crate::config::{Config, TtlPolicy};
use crate::error::{CacheError, Result};
use crate::models::{
    CacheOverviewResponse, CacheTestResponse, HealthResponse, InvalidatePatternRequest,
    InvalidateResponse, SessionResponse,
};

pub const CACHE_TEST_KEY: &str = "test:demo";
pub const CACHE_TEST_MANUAL_KEY: &str = "test:manual";
const CACHE_TEST_TTL: Duration = Duration::from_secs(5);

/// Application state shared across all handlers.
///
/// Every cache here records into the same hit/miss counters and is
/// registered for administrative operations and the cleanup task.
#[derive(Clone)]
pub struct AppState {
    /// General-purpose JSON cache
    pub scratch: Cache<Value>,
    /// Product listings and single products
    pub catalog: ProductCache<Value, Value>,
    pub orders: OrderCache<Value>,
    pub shipping_methods: ShippingMethodsCache<Value>,
    /// Checkout state keyed by session
    pub checkouts: SessionCache<Value>,
    /// Signed-in user state keyed by session
    pub user_sessions: SessionCache<Value>,
    /// Every cache above, for bulk operations
    pub registry: CacheRegistry,
    pub stats: Arc<CacheStats>,
    pub ttl: TtlPolicy,
}

impl AppState {
    /// Creates the caches for the given TTL policy.
    pub fn new(ttl: TtlPolicy) -> Self {
        let stats = Arc::new(CacheStats::new());
        let cache =
            |name: &str, default_ttl| Cache::with_stats(name, default_ttl, Arc::clone(&stats));

        let scratch = cache("scratch", ttl.products);
        let listings = cache("product_listings", ttl.products);
        let products = cache("products", ttl.product);
        let orders = cache("orders", ttl.order);
        let shipping_methods = cache("shipping_methods", ttl.shipping_methods);
        let checkout_cache = cache("checkouts", ttl.checkout);
        let user_cache = cache("user_sessions", ttl.user_session);

        let registry = CacheRegistry::new()
            .with(&scratch)
            .with(&listings)
            .with(&products)
            .with(&orders)
            .with(&shipping_methods)
            .with(&checkout_cache)
            .with(&user_cache);

        Self {
            scratch,
            catalog: ProductCache::new(listings, products, ttl.products, ttl.product),
            orders: OrderCache::new(orders, ttl.order),
            shipping_methods: ShippingMethodsCache::new(shipping_methods, ttl.shipping_methods),
            checkouts: SessionCache::new(checkout_cache, CHECKOUT_PREFIX, ttl.checkout),
            user_sessions: SessionCache::new(user_cache, USER_SESSION_PREFIX, ttl.user_session),
            registry,
            stats,
            ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ttl.clone())
    }
}

/// Handler for GET /admin/cache
///
/// Returns entry count, sorted keys and hit/miss statistics.
pub async fn cache_overview_handler(State(state): State<AppState>) -> Json<CacheOverviewResponse> {
    Json(CacheOverviewResponse::new(
        state.registry.snapshot(),
        state.stats.snapshot(),
    ))
}

/// Handler for DELETE /admin/cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.registry.clear();
    Json(InvalidateResponse::new(
        "All cache cleared successfully",
        removed,
    ))
}

/// Handler for POST /admin/cache/invalidate
///
/// Removes every entry matching a regular expression.
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidatePatternRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.registry.invalidate_pattern(&req.pattern)?;

    Ok(Json(InvalidateResponse::new(
        format!("Cleared cache entries matching pattern: {}", req.pattern),
        removed,
    )))
}

/// Handler for DELETE /admin/cache/keys/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.registry.invalidate(&key);
    info!(key = %key, removed, "admin key invalidation");
    Json(InvalidateResponse::new(
        format!("Cleared cache entry: {}", key),
        removed,
    ))
}

/// Handler for DELETE /admin/cache/checkout-sessions
pub async fn clear_checkout_sessions_handler(
    State(state): State<AppState>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.checkouts.invalidate_all()?;
    Ok(Json(InvalidateResponse::new(
        "All checkout session cache cleared",
        removed,
    )))
}

/// Handler for DELETE /admin/cache/products
///
/// Drops every product listing and single product.
pub async fn invalidate_products_handler(
    State(state): State<AppState>,
) -> Result<Json<InvalidateResponse>> {
    let removed = state.catalog.invalidate_products()?;
    Ok(Json(InvalidateResponse::new("Product cache cleared", removed)))
}

/// Handler for DELETE /admin/cache/orders/:order_id
pub async fn invalidate_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = usize::from(state.orders.invalidate_order(&order_id));
    Json(InvalidateResponse::new(
        format!("Cleared cached order: {}", order_id),
        removed,
    ))
}

/// Handler for POST /admin/cache/stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<CacheOverviewResponse> {
    state.stats.reset();
    info!("cache statistics reset");
    cache_overview_handler(State(state)).await
}

/// Handler for GET /cache-test
///
/// Cache-aside demo: the payload is generated on a miss and served from the
/// cache for the next few seconds.
pub async fn cache_test_handler(State(state): State<AppState>) -> Result<Json<CacheTestResponse>> {
    let cached = state
        .scratch
        .get_or_fetch(
            CACHE_TEST_KEY,
            || async {
                info!("Cache miss - generating new data");
                Ok::<_, CacheError>(json!({
                    "message": "Hello from cache!",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }))
            },
            CACHE_TEST_TTL,
        )
        .await?;

    Ok(Json(CacheTestResponse {
        cached,
        cache_stats: state.scratch.snapshot(),
    }))
}

/// Handler for POST /cache-test/manual
pub async fn cache_test_manual_handler(State(state): State<AppState>) -> Json<Value> {
    state.scratch.set(
        CACHE_TEST_MANUAL_KEY,
        json!({ "manual": true, "time": chrono::Utc::now().to_rfc3339() }),
        state.ttl.products,
    );
    Json(json!({ "success": true }))
}

/// Handler for DELETE /cache-test
pub async fn cache_test_clear_handler(State(state): State<AppState>) -> Json<Value> {
    state.scratch.invalidate(CACHE_TEST_KEY);
    Json(json!({ "success": true }))
}

/// Handler for PUT /sessions/:session_id/checkout
///
/// Stores the in-progress checkout for a session with the checkout TTL.
pub async fn put_checkout_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(data): Json<Value>,
) -> Json<SessionResponse> {
    state.checkouts.set(&session_id, data.clone());
    Json(SessionResponse {
        key: state.checkouts.key_for(&session_id),
        session_id,
        data,
    })
}

/// Handler for GET /sessions/:session_id/checkout
pub async fn get_checkout_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let key = state.checkouts.key_for(&session_id);
    let data = state
        .checkouts
        .get(&session_id)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(SessionResponse {
        session_id,
        key,
        data,
    }))
}

/// Handler for DELETE /sessions/:session_id/checkout
pub async fn delete_checkout_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = usize::from(state.checkouts.invalidate(&session_id));
    Json(InvalidateResponse::new(
        format!("Cleared checkout for session: {}", session_id),
        removed,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
