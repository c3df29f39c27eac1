//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the key scheme, the bounded in-memory store, and read-through hits.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{keys, CacheAside, CacheBackend, CacheStore, ManualClock, MemoryCache};
use crate::config::CACHE_TTL_SECS;
use crate::error::ServiceError;

// == Strategies ==
fn cache_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}:[0-9]{1,6}"
}

fn payload_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,128}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Equal inputs give byte-identical keys across repeated calls.
    #[test]
    fn prop_page_key_is_pure(page in any::<i64>(), size in any::<i64>()) {
        let first = keys::page_key(page, size);
        for _ in 0..3 {
            prop_assert_eq!(&keys::page_key(page, size), &first);
        }
        prop_assert_eq!(first, format!("items:page:{}:size:{}", page, size));
    }

    /// Distinct page coordinates never share a key.
    #[test]
    fn prop_page_key_is_injective(
        a in (1i64..10_000, 1i64..=100),
        b in (1i64..10_000, 1i64..=100),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(keys::page_key(a.0, a.1), keys::page_key(b.0, b.1));
    }

    #[test]
    fn prop_item_and_comment_keys_are_pure(id in any::<i64>()) {
        prop_assert_eq!(keys::item_key(id), keys::item_key(id));
        prop_assert_eq!(keys::comments_key(id), keys::comments_key(id));
        prop_assert_ne!(keys::item_key(id), keys::comments_key(id));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The store never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((cache_key_strategy(), payload_strategy()), 1..200)
    ) {
        let max_entries = 50;
        let mut store = CacheStore::new(max_entries);

        for (key, value) in entries {
            store.set(&key, value, CACHE_TTL_SECS).unwrap();
            prop_assert!(store.len() <= max_entries);
        }
    }

    /// Deleting a key makes the next read miss.
    #[test]
    fn prop_delete_removes_entry(key in cache_key_strategy(), value in payload_strategy()) {
        let mut store = CacheStore::new(100);
        store.set(&key, value, CACHE_TTL_SECS).unwrap();

        prop_assert!(store.delete(&key));
        prop_assert!(store.get(&key).is_none());
    }

    /// Nothing written survives a full TTL of clock movement.
    #[test]
    fn prop_no_entry_survives_ttl(
        written in prop::collection::hash_set(cache_key_strategy(), 1..30),
        elapsed_extra in 0u64..10_000,
    ) {
        let clock = Arc::new(ManualClock::starting_at(0));
        let mut store = CacheStore::with_clock(1_000, clock.clone());
        for key in &written {
            store.set(key, "v".to_string(), CACHE_TTL_SECS).unwrap();
        }

        clock.advance(Duration::from_secs(CACHE_TTL_SECS) + Duration::from_millis(elapsed_extra));

        let live: HashSet<&String> = written.iter().filter(|k| store.get(k).is_some()).collect();
        prop_assert!(live.is_empty());
    }

    /// After one populating read, repeated reads return the same value without loading again.
    #[test]
    fn prop_read_through_hits_after_populate(
        key in cache_key_strategy(),
        payload in payload_strategy(),
        repeats in 1usize..10,
    ) {
        let cache = MemoryCache::new(100);
        let aside = CacheAside::new(Arc::new(cache.clone()));
        let loads = AtomicUsize::new(0);
        let (loads_ref, payload_ref) = (&loads, &payload);
        let load = move || async move {
            loads_ref.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ServiceError>(payload_ref.clone())
        };

        tokio_test::block_on(async {
            let first = aside.read_through(&key, load).await.unwrap();
            let raw = cache.get(&key).await.unwrap();
            for _ in 0..repeats {
                let again = aside.read_through(&key, load).await.unwrap();
                assert_eq!(again, first);
                assert_eq!(cache.get(&key).await.unwrap(), raw);
            }
        });

        prop_assert_eq!(loads.load(Ordering::SeqCst), 1);
        prop_assert_eq!(aside.stats().hits, repeats as u64);
    }
}
