//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine against a plain HashMap model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::cache::TtlCache;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates colon-structured keys from a small alphabet so prefixes collide
fn key_strategy() -> impl Strategy<Value = String> {
    ("(notebook|notes|sources)", "[0-9]{1,3}").prop_map(|(kind, id)| format!("{}:{}", kind, id))
}

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "(notebook|notes|sources)".prop_map(|kind| format!("{}:", kind)),
        key_strategy(),
        "[a-z]{0,3}",
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
    Invalidate { prefix: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => prefix_strategy().prop_map(|prefix| CacheOp::Invalidate { prefix }),
        1 => Just(CacheOp::Clear),
    ]
}

/// Runs `f` inside a runtime whose clock only moves when advanced.
fn with_paused_clock<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Counters and contents track a HashMap model for any operation sequence
    // performed within the TTL.
    #[test]
    fn prop_model_equivalence(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache = TtlCache::new(TEST_TTL);
        let mut model: HashMap<String, u32> = HashMap::new();
        let (mut hits, mut misses, mut evictions) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let expected = model.get(&key).copied();
                    prop_assert_eq!(cache.get(&key), expected);
                    match expected {
                        Some(_) => hits += 1,
                        None => misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.remove(&key);
                }
                CacheOp::Invalidate { prefix } => {
                    let before = model.len();
                    model.retain(|key, _| !key.starts_with(&prefix));
                    let expected = before - model.len();
                    prop_assert_eq!(cache.invalidate_pattern(&prefix), expected);
                    evictions += expected as u64;
                }
                CacheOp::Clear => {
                    cache.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, misses, "Misses mismatch");
        prop_assert_eq!(stats.evictions, evictions, "Evictions mismatch");
    }

    // Invalidation removes exactly the literal-prefix matches and nothing else.
    #[test]
    fn prop_invalidate_pattern_exact(
        keys in prop::collection::hash_set(key_strategy(), 0..40),
        prefix in prefix_strategy()
    ) {
        let cache = TtlCache::new(TEST_TTL);
        for key in &keys {
            cache.set(key.clone(), key.len());
        }

        let matching: HashSet<&String> = keys.iter().filter(|k| k.starts_with(&prefix)).collect();
        let removed = cache.invalidate_pattern(&prefix);

        prop_assert_eq!(removed, matching.len());
        prop_assert_eq!(cache.stats().evictions, matching.len() as u64);
        prop_assert_eq!(cache.len(), keys.len() - matching.len());
        for key in &keys {
            let present = cache.get(key).is_some();
            prop_assert_eq!(present, !matching.contains(key), "key {}", key);
        }
    }

    // Clear empties the cache for any prior contents.
    #[test]
    fn prop_clear_empties(keys in prop::collection::vec(key_strategy(), 0..30)) {
        let cache = TtlCache::new(TEST_TTL);
        for key in &keys {
            cache.set(key.clone(), ());
        }

        cache.clear();

        prop_assert_eq!(cache.len(), 0);
        for key in &keys {
            prop_assert!(cache.get(key).is_none());
        }
    }
}

// Separate block with fewer cases for clock-driven tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // A value is served on [t, t + ttl) and missed from t + ttl on.
    #[test]
    fn prop_ttl_window(ttl_ms in 1u64..10_000, offset_ms in 0u64..20_000) {
        let (found, stats) = with_paused_clock(async move {
            let cache = TtlCache::new(Duration::from_millis(ttl_ms));
            cache.set("notebook:1", "nb");
            tokio::time::advance(Duration::from_millis(offset_ms)).await;
            (cache.get("notebook:1"), cache.stats())
        });

        if offset_ms < ttl_ms {
            prop_assert_eq!(found, Some("nb"));
            prop_assert_eq!(stats.hits, 1);
        } else {
            prop_assert_eq!(found, None);
            prop_assert_eq!(stats.misses, 1);
        }
    }

    // After a sweep at t no entry with expires_at <= t remains, and evictions
    // grow by exactly the number removed.
    #[test]
    fn prop_sweep_removes_all_expired(
        set_offsets in prop::collection::vec(0u64..5_000, 1..30),
        sweep_at in 0u64..10_000
    ) {
        with_paused_clock(async move {
            let ttl = Duration::from_millis(2_000);
            let cache = TtlCache::new(ttl);
            let mut elapsed = 0;
            let mut expires = Vec::new();

            let mut offsets = set_offsets;
            offsets.sort_unstable();
            for (i, offset) in offsets.into_iter().enumerate() {
                tokio::time::advance(Duration::from_millis(offset - elapsed)).await;
                elapsed = offset;
                cache.set(format!("k{}", i), i);
                expires.push(offset + 2_000);
            }

            if sweep_at > elapsed {
                tokio::time::advance(Duration::from_millis(sweep_at - elapsed)).await;
                elapsed = sweep_at;
            }

            let expected_removed = expires.iter().filter(|e| **e <= elapsed).count();
            let removed = cache.sweep_expired();

            prop_assert_eq!(removed, expected_removed);
            prop_assert_eq!(cache.len(), expires.len() - expected_removed);
            prop_assert_eq!(cache.stats().evictions, expected_removed as u64);
            Ok(())
        })?;
    }
}
