//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store, invalidation and cache-aside behavior over
//! generated inputs.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{Cache, CacheStore};

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates identifier-like key suffixes
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates keys in the `{domain}:{id}` convention
fn namespaced_key_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("product"), Just("products"), Just("order"), Just("checkout")],
        "[a-z0-9]{1,8}",
    )
        .prop_map(|(domain, id)| format!("{}:{}", domain, id))
}

/// Operations driving the cache-aside statistics model
#[derive(Debug, Clone)]
enum AsideOp {
    Fetch { key: String },
    Invalidate { key: String },
}

fn aside_op_strategy() -> impl Strategy<Value = AsideOp> {
    let key = prop_oneof![Just("a"), Just("b"), Just("c"), Just("d")].prop_map(String::from);
    prop_oneof![
        3 => key.clone().prop_map(|key| AsideOp::Fetch { key }),
        1 => key.prop_map(|key| AsideOp::Invalidate { key }),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a pair and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = CacheStore::new();

        store.set(key.clone(), value.clone(), TEST_TTL);

        prop_assert_eq!(store.get(&key), Some(&value), "Round-trip value mismatch");
    }

    // Last write wins and the key is stored once.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = CacheStore::new();

        store.set(key.clone(), value1, TEST_TTL);
        store.set(key.clone(), value2.clone(), TEST_TTL);

        prop_assert_eq!(store.get(&key), Some(&value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Invalidating twice is the same as invalidating once.
    #[test]
    fn prop_invalidate_idempotent(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        others in prop::collection::vec(valid_key_strategy(), 0..10)
    ) {
        let mut store = CacheStore::new();
        for other in &others {
            store.set(other.clone(), "other".to_string(), TEST_TTL);
        }
        store.set(key.clone(), value, TEST_TTL);

        store.invalidate(&key);
        let after_once = {
            let mut keys = store.keys();
            keys.sort();
            keys
        };
        store.invalidate(&key);
        let mut after_twice = store.keys();
        after_twice.sort();

        prop_assert_eq!(after_once, after_twice);
        prop_assert!(store.get(&key).is_none());
    }

    // A prefix pattern removes exactly the keys with that prefix.
    #[test]
    fn prop_pattern_invalidation_scope(
        keys in prop::collection::hash_set(namespaced_key_strategy(), 1..40)
    ) {
        let cache: Cache<u32> = Cache::new("props", TEST_TTL);
        for key in &keys {
            cache.set(key.as_str(), 1, TEST_TTL);
        }

        let expected_removed = keys.iter().filter(|k| k.starts_with("product:")).count();
        let removed = cache.invalidate_pattern("^product:").unwrap();

        prop_assert_eq!(removed, expected_removed);
        let remaining: HashSet<String> = cache.keys().into_iter().collect();
        let expected: HashSet<String> = keys
            .into_iter()
            .filter(|k| !k.starts_with("product:"))
            .collect();
        prop_assert_eq!(remaining, expected);
    }

    // A pattern that fails to compile never modifies the cache.
    #[test]
    fn prop_invalid_pattern_leaves_cache_untouched(
        keys in prop::collection::hash_set(namespaced_key_strategy(), 0..20),
        prefix in "[a-z:]{0,8}"
    ) {
        let cache: Cache<u32> = Cache::new("props", TEST_TTL);
        for key in &keys {
            cache.set(key.as_str(), 1, TEST_TTL);
        }

        let pattern = format!("{}(", prefix);
        prop_assert!(cache.invalidate_pattern(&pattern).is_err());
        prop_assert_eq!(cache.size(), keys.len());
    }

    // Cache-aside stats match a model where a key is fetched once until invalidated.
    #[test]
    fn prop_cache_aside_statistics_accuracy(
        ops in prop::collection::vec(aside_op_strategy(), 1..60)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let cache: Cache<String> = Cache::new("props", TEST_TTL);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let mut cached: HashSet<String> = HashSet::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                AsideOp::Fetch { key } => {
                    let expected = format!("value_{}", key);
                    let produced = expected.clone();
                    let value = rt
                        .block_on(cache.get_or_fetch(
                            &key,
                            move || async move {
                                counter.fetch_add(1, Ordering::SeqCst);
                                Ok::<_, ()>(produced)
                            },
                            TEST_TTL,
                        ))
                        .unwrap();
                    prop_assert_eq!(value, expected);

                    if cached.insert(key.clone()) {
                        expected_misses += 1;
                    } else {
                        expected_hits += 1;
                    }
                }
                AsideOp::Invalidate { key } => {
                    cache.invalidate(&key);
                    cached.remove(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(calls.load(Ordering::SeqCst) as u64, expected_misses);
        prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate <= 100.0);
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After the TTL has elapsed, a read returns nothing and reclaims the entry.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in valid_value_strategy()
    ) {
        let mut store = CacheStore::new();

        store.set(key.clone(), value.clone(), Duration::from_millis(50));

        prop_assert_eq!(store.get(&key), Some(&value), "Value should match before expiration");

        sleep(Duration::from_millis(80));

        prop_assert!(store.get(&key).is_none(), "Entry should not be found after TTL expires");
        prop_assert!(store.is_empty(), "Expired entry should be reclaimed by the read");
    }
}

// == Property Test for Error Response Format ==
// This tests the CacheError -> HTTP response conversion

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every error renders as JSON with a descriptive "error" string.
    #[test]
    fn prop_error_response_format(
        error_msg in "[a-zA-Z0-9 _-]{1,100}"
    ) {
        use crate::error::CacheError;
        use axum::response::IntoResponse;
        use axum::body::to_bytes;

        let pattern_error = regex::Regex::new(&format!("{}(", error_msg)).unwrap_err();
        let error_variants = vec![
            CacheError::InvalidPattern { pattern: error_msg.clone(), source: pattern_error },
            CacheError::InvalidRequest(error_msg.clone()),
            CacheError::NotFound(error_msg.clone()),
        ];

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async {
                to_bytes(response.into_body(), usize::MAX).await.unwrap()
            });

            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Shared `Cache` handles used from many tasks at once

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent readers only ever see complete values that some writer stored.
    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..20
        ),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();

        let cache: Cache<String> = Cache::new("props", TEST_TTL);
        for (key, value) in &initial_entries {
            cache.set(key.as_str(), value.clone(), TEST_TTL);
        }

        // Every value that could legitimately be observed per key
        let mut written: HashMap<String, HashSet<String>> = HashMap::new();
        for (key, value) in initial_entries.iter() {
            written.entry(key.clone()).or_default().insert(value.clone());
        }
        for op in &operations {
            if let CacheOp::Set { key, value } = op {
                written.entry(key.clone()).or_default().insert(value.clone());
            }
        }
        let written = Arc::new(written);

        let results: Vec<Result<(), String>> = rt.block_on(async {
            let mut handles = vec![];

            for op in operations {
                let cache = cache.clone();
                let written = Arc::clone(&written);

                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            cache.set(key, value, TEST_TTL);
                            Ok(())
                        }
                        CacheOp::Get { key } => match cache.get(&key) {
                            Some(value) if !written.get(&key).map_or(false, |v| v.contains(&value)) => {
                                Err(format!("Unexpected value '{}' for key '{}'", value, key))
                            }
                            _ => Ok(()),
                        },
                        CacheOp::Invalidate { key } => {
                            cache.invalidate(&key);
                            Ok(())
                        }
                    }
                }));
            }

            let mut results = vec![];
            for handle in handles {
                results.push(handle.await.expect("Task should not panic"));
            }
            results
        });

        for result in results {
            prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
        }

        for key in cache.keys() {
            prop_assert!(written.contains_key(&key), "Unknown key '{}' in cache", key);
        }
    }
}
