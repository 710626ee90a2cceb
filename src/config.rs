//! Configuration Module
//!
//! Handles loading server and cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

// == TTL Policy ==
/// Time-to-live per cached resource kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TtlPolicy {
    /// Product listings
    pub products: Duration,
    /// Single product
    pub product: Duration,
    /// Checkout / in-progress session state
    pub checkout: Duration,
    /// Shipping method catalog
    pub shipping_methods: Duration,
    /// Order
    pub order: Duration,
    /// User session
    pub user_session: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            products: Duration::from_secs(10 * 60),
            product: Duration::from_secs(5 * 60),
            checkout: Duration::from_secs(30),
            shipping_methods: Duration::from_secs(5 * 60),
            order: Duration::from_secs(60 * 60),
            user_session: Duration::from_secs(30 * 60),
        }
    }
}

impl TtlPolicy {
    /// Loads TTLs from environment variables, given in seconds.
    ///
    /// # Environment Variables
    /// - `TTL_PRODUCTS` (default: 600)
    /// - `TTL_PRODUCT` (default: 300)
    /// - `TTL_CHECKOUT` (default: 30)
    /// - `TTL_SHIPPING_METHODS` (default: 300)
    /// - `TTL_ORDER` (default: 3600)
    /// - `TTL_USER_SESSION` (default: 1800)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            products: env_secs("TTL_PRODUCTS", defaults.products),
            product: env_secs("TTL_PRODUCT", defaults.product),
            checkout: env_secs("TTL_CHECKOUT", defaults.checkout),
            shipping_methods: env_secs("TTL_SHIPPING_METHODS", defaults.shipping_methods),
            order: env_secs("TTL_ORDER", defaults.order),
            user_session: env_secs("TTL_USER_SESSION", defaults.user_session),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Whether the background cleanup task runs at all
    pub cleanup_enabled: bool,
    /// Per-resource TTLs
    pub ttl: TtlPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 300)
    /// - `CLEANUP_ENABLED` - `false`/`0` disables the cleanup task (default: true)
    /// - `TTL_*` - see [`TtlPolicy::from_env`]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: env_parse("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            cleanup_enabled: env::var("CLEANUP_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.cleanup_enabled),
            ttl: TtlPolicy::from_env(),
        }
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 300,
            cleanup_enabled: true,
            ttl: TtlPolicy::default(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_secs(name: &str, default: Duration) -> Duration {
    env_parse(name).map(Duration::from_secs).unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 300);
        assert!(config.cleanup_enabled);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_ttl_policy_default() {
        let ttl = TtlPolicy::default();
        assert_eq!(ttl.products, Duration::from_secs(600));
        assert_eq!(ttl.product, Duration::from_secs(300));
        assert_eq!(ttl.checkout, Duration::from_secs(30));
        assert_eq!(ttl.shipping_methods, Duration::from_secs(300));
        assert_eq!(ttl.order, Duration::from_secs(3600));
        assert_eq!(ttl.user_session, Duration::from_secs(1800));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("TTL_CHECKOUT");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 300);
        assert_eq!(config.ttl.checkout, Duration::from_secs(30));
    }

    // The only test touching CLEANUP_ENABLED
    #[test]
    fn test_cleanup_enabled_from_env() {
        env::remove_var("CLEANUP_ENABLED");
        assert!(Config::from_env().cleanup_enabled);

        env::set_var("CLEANUP_ENABLED", "false");
        let disabled = Config::from_env().cleanup_enabled;

        env::set_var("CLEANUP_ENABLED", "garbage");
        let unparsable = Config::from_env().cleanup_enabled;
        env::remove_var("CLEANUP_ENABLED");

        assert!(!disabled);
        assert!(unparsable);
    }

    #[test]
    fn test_ttl_override_from_env() {
        env::set_var("TTL_ORDER", "120");
        let ttl = TtlPolicy::from_env();
        env::remove_var("TTL_ORDER");

        assert_eq!(ttl.order, Duration::from_secs(120));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
