//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the local store's size accounting, eviction order,
//! and the manager's key derivation over generated inputs.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tokio_test::block_on;

use crate::cache::{create_key, CacheBackend, LocalStore, TieredStore};

// == Test Configuration ==
const TEST_TTL: u64 = 300;

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

/// Generates payloads up to 64 bytes
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Delete { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        6 => (key_strategy(), payload_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Clear),
    ]
}

/// Sum of the sizes of the entries the store still reports as present.
async fn present_bytes(store: &LocalStore, keys: &[String]) -> usize {
    let mut total = 0;
    for key in keys {
        if let Some(value) = store.get(key).await.unwrap() {
            total += value.len();
        }
    }
    total
}

fn all_keys() -> Vec<String> {
    let letters = ["a", "b", "c", "d", "e", "f"];
    let mut keys: Vec<String> = letters.iter().map(|s| s.to_string()).collect();
    for a in letters {
        for b in letters {
            keys.push(format!("{}{}", a, b));
        }
    }
    keys
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of set/get/delete/clear operations, the occupied byte
    // count equals the sum of the sizes of the entries still present, and
    // never exceeds capacity.
    #[test]
    fn prop_occupied_bytes_match_entries(
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
        capacity in 64usize..512
    ) {
        block_on(async {
            let store = LocalStore::new(capacity);

            for op in ops {
                match op {
                    CacheOp::Set { key, value } => {
                        store.set(&key, value, TEST_TTL).await.unwrap();
                    }
                    CacheOp::Get { key } => {
                        store.get(&key).await.unwrap();
                    }
                    CacheOp::Delete { key } => {
                        store.delete(&key).await.unwrap();
                    }
                    CacheOp::Clear => {
                        store.clear().await.unwrap();
                    }
                }
                let occupied = store.occupied_bytes().await;
                prop_assert!(occupied <= capacity, "occupied {} > capacity {}", occupied, capacity);
            }

            let occupied = store.occupied_bytes().await;
            let expected = present_bytes(&store, &all_keys()).await;
            prop_assert_eq!(occupied, expected, "Occupied bytes drifted from entries");
            Ok(())
        })?;
    }

    // *For any* set of distinct fixed-size entries filling the store, one more
    // insert evicts exactly the first inserted and keeps the newcomer.
    #[test]
    fn prop_fifo_eviction_order(
        fill in 2usize..10,
        entry_size in 1usize..32
    ) {
        block_on(async {
            let store = LocalStore::new(fill * entry_size);
            let keys: Vec<String> = (0..fill).map(|i| format!("key{}", i)).collect();

            for key in &keys {
                store.set(key, vec![7; entry_size], TEST_TTL).await.unwrap();
            }
            // Reads must not change the eviction order
            for key in keys.iter().rev() {
                prop_assert!(store.get(key).await.unwrap().is_some());
            }

            store.set("newcomer", vec![9; entry_size], TEST_TTL).await.unwrap();

            prop_assert!(store.get(&keys[0]).await.unwrap().is_none(), "Oldest key survived");
            prop_assert!(store.get("newcomer").await.unwrap().is_some(), "New key was evicted");
            for key in keys.iter().skip(1) {
                prop_assert!(store.get(key).await.unwrap().is_some(), "Key {} evicted early", key);
            }
            prop_assert_eq!(store.occupied_bytes().await, fill * entry_size);
            Ok(())
        })?;
    }

    // *For any* value written through the tiered store, dropping it from L1
    // alone does not lose it.
    #[test]
    fn prop_tiered_read_through(key in key_strategy(), value in payload_strategy()) {
        block_on(async {
            let l2 = LocalStore::new(4096);
            let store = TieredStore::new(LocalStore::new(4096), l2, TEST_TTL);

            store.set(&key, value.clone(), TEST_TTL).await.unwrap();
            store.local().delete(&key).await.unwrap();

            prop_assert_eq!(store.get(&key).await.unwrap(), Some(value.clone()));
            prop_assert_eq!(store.local().get(&key).await.unwrap(), Some(value));
            Ok(())
        })?;
    }

    // *For any* named arguments, insertion order does not change the key.
    #[test]
    fn prop_create_key_ignores_kwarg_order(
        kwargs in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8),
        positional in prop::collection::vec("[a-z0-9]{0,12}", 0..4)
    ) {
        let sorted: BTreeMap<String, i64> = kwargs.clone();
        let reversed: Vec<(String, i64)> = kwargs.into_iter().rev().collect();
        let hashed: HashMap<String, i64> = reversed.into_iter().collect();

        prop_assert_eq!(
            create_key(&positional, &sorted).unwrap(),
            create_key(&positional, &hashed).unwrap()
        );
    }

    // *For any* two different positional argument lists, the keys differ.
    #[test]
    fn prop_create_key_separates_arguments(
        a in prop::collection::vec("[a-z0-9]{0,12}", 0..4),
        b in prop::collection::vec("[a-z0-9]{0,12}", 0..4)
    ) {
        prop_assume!(a != b);
        let none: BTreeMap<String, i64> = BTreeMap::new();
        prop_assert_ne!(create_key(&a, &none).unwrap(), create_key(&b, &none).unwrap());
    }
}
