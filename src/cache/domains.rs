//! Storefront Domain Caches
//!
//! Thin typed fronts over [`Cache`] for the catalog, orders and the shipping
//! method list. Each owns its key scheme from [`keys`](crate::cache::keys)
//! and stores with its resource TTL.

use std::fmt::Display;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::cache::handle::compile_pattern;
use crate::cache::keys::{
    order_key, product_key, products_key, PRODUCTS_PATTERN, PRODUCT_PATTERN,
    SHIPPING_METHODS_KEY,
};
use crate::cache::Cache;
use crate::error::Result;

// == Product Cache ==
/// Product listings and single products.
///
/// Listings are keyed by their serialized search parameters, products by id.
#[derive(Debug, Clone)]
pub struct ProductCache<L, P> {
    listings: Cache<L>,
    products: Cache<P>,
    listing_ttl: Duration,
    product_ttl: Duration,
}

impl<L, P> ProductCache<L, P> {
    pub fn new(
        listings: Cache<L>,
        products: Cache<P>,
        listing_ttl: Duration,
        product_ttl: Duration,
    ) -> Self {
        Self {
            listings,
            products,
            listing_ttl,
            product_ttl,
        }
    }

    pub fn listings(&self) -> &Cache<L> {
        &self.listings
    }

    pub fn products(&self) -> &Cache<P> {
        &self.products
    }

    pub fn set_products<Q: Serialize>(&self, params: &Q, data: L) -> serde_json::Result<()> {
        self.listings.set(products_key(params)?, data, self.listing_ttl);
        Ok(())
    }

    pub fn set_product(&self, id: impl Display, data: P) {
        self.products.set(product_key(id), data, self.product_ttl);
    }

    // == Invalidate Products ==
    /// Drops every listing and every single product.
    pub fn invalidate_products(&self) -> Result<usize> {
        let mut removed = 0;
        for pattern in [PRODUCTS_PATTERN, PRODUCT_PATTERN] {
            let regex = compile_pattern(pattern)?;
            removed += self.listings.invalidate_regex(&regex);
            removed += self.products.invalidate_regex(&regex);
        }
        info!(removed, "invalidated product catalog");
        Ok(removed)
    }
}

impl<L: Clone, P: Clone> ProductCache<L, P> {
    pub fn get_products<Q: Serialize>(&self, params: &Q) -> serde_json::Result<Option<L>> {
        Ok(self.listings.get(&products_key(params)?))
    }

    pub fn get_product(&self, id: impl Display) -> Option<P> {
        self.products.get(&product_key(id))
    }
}

// == Order Cache ==
#[derive(Debug, Clone)]
pub struct OrderCache<T> {
    cache: Cache<T>,
    ttl: Duration,
}

impl<T> OrderCache<T> {
    pub fn new(cache: Cache<T>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn cache(&self) -> &Cache<T> {
        &self.cache
    }

    pub fn set_order(&self, id: impl Display, data: T) {
        self.cache.set(order_key(id), data, self.ttl);
    }

    pub fn invalidate_order(&self, id: impl Display) -> bool {
        self.cache.invalidate(&order_key(id))
    }
}

impl<T: Clone> OrderCache<T> {
    pub fn get_order(&self, id: impl Display) -> Option<T> {
        self.cache.get(&order_key(id))
    }
}

// == Shipping Methods Cache ==
/// The store-wide shipping method list, held under a single key.
#[derive(Debug, Clone)]
pub struct ShippingMethodsCache<T> {
    cache: Cache<T>,
    ttl: Duration,
}

impl<T> ShippingMethodsCache<T> {
    pub fn new(cache: Cache<T>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn cache(&self) -> &Cache<T> {
        &self.cache
    }

    pub fn set(&self, methods: T) {
        self.cache.set(SHIPPING_METHODS_KEY, methods, self.ttl);
    }

    pub fn invalidate(&self) -> bool {
        self.cache.invalidate(SHIPPING_METHODS_KEY)
    }
}

impl<T: Clone> ShippingMethodsCache<T> {
    pub fn get(&self) -> Option<T> {
        self.cache.get(SHIPPING_METHODS_KEY)
    }
}
