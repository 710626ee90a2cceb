//! Cache Key Conventions
//!
//! Keys are `{domain}:{identifier}` strings. Keeping every caller on these
//! builders is what makes prefix invalidation reliable.

use serde::Serialize;

pub const PRODUCTS_PREFIX: &str = "products";
pub const PRODUCT_PREFIX: &str = "product";
pub const CHECKOUT_PREFIX: &str = "checkout";
pub const ORDER_PREFIX: &str = "order";
pub const USER_SESSION_PREFIX: &str = "user_session";

pub const SHIPPING_METHODS_KEY: &str = "shipping_methods";

/// Matches every product listing key.
pub const PRODUCTS_PATTERN: &str = "^products:";
/// Matches every single-product key.
pub const PRODUCT_PATTERN: &str = "^product:";
/// Matches every checkout session key.
pub const CHECKOUT_PATTERN: &str = "^checkout:";

/// Key for a product listing, identified by its serialized search parameters.
pub fn products_key<P: Serialize>(params: &P) -> serde_json::Result<String> {
    Ok(format!("{}:{}", PRODUCTS_PREFIX, serde_json::to_string(params)?))
}

pub fn product_key(id: impl std::fmt::Display) -> String {
    format!("{}:{}", PRODUCT_PREFIX, id)
}

pub fn order_key(id: impl std::fmt::Display) -> String {
    format!("{}:{}", ORDER_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    #[test]
    fn test_products_key_serializes_params() {
        let key = products_key(&json!({"page": 2})).unwrap();
        assert_eq!(key, r#"products:{"page":2}"#);
    }

    #[test]
    fn test_patterns_separate_listing_from_single_product() {
        let products = Regex::new(PRODUCTS_PATTERN).unwrap();
        let product = Regex::new(PRODUCT_PATTERN).unwrap();
        let listing = products_key(&json!({})).unwrap();

        assert!(products.is_match(&listing));
        assert!(!products.is_match(&product_key(1)));
        assert!(product.is_match(&product_key(1)));
        assert!(!product.is_match(&listing));
        assert!(!product.is_match(&order_key(1)));
    }

    #[test]
    fn test_checkout_pattern_matches_session_keys_only() {
        let checkout = Regex::new(CHECKOUT_PATTERN).unwrap();

        assert!(checkout.is_match(&crate::cache::session_key("s1", CHECKOUT_PREFIX, None)));
        assert!(!checkout.is_match(SHIPPING_METHODS_KEY));
        assert!(!checkout.is_match(&order_key("checkout")));
    }
}
