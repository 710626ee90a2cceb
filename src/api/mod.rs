//! API Module
//!
//! HTTP handlers and routing for cache administration.
//!
//! # Endpoints
//! - `GET /admin/cache` - Inspect keys and statistics
//! - `DELETE /admin/cache` - Clear all caches
//! - `POST /admin/cache/invalidate` - Pattern invalidation
//! - `DELETE /admin/cache/keys/:key` - Point invalidation
//! - `DELETE /admin/cache/checkout-sessions` - Drop all checkout sessions
//! - `DELETE /admin/cache/products` - Drop product listings and products
//! - `DELETE /admin/cache/orders/:order_id` - Drop one cached order
//! - `POST /admin/cache/stats/reset` - Reset statistics
//! - `/cache-test` - Cache-aside demo
//! - `/sessions/:session_id/checkout` - Session-scoped checkout cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
