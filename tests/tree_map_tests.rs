//! Behavior tests shared by all five tree variants.
//!
//! One generic suite is instantiated per variant, so every container is
//! held to the same contract; variant-specific behavior (shape
//! invariants, splay root movement, treap determinism) lives in the
//! dedicated modules at the bottom.

use std::collections::BTreeSet;

use ordtrees::prelude::*;
use ordtrees::tree::TreapBalance;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

macro_rules! tree_suite {
    ($module:ident, $tree:ty) => {
        mod $module {
            use super::*;

            fn filled(keys: &[i32]) -> $tree {
                let mut map = <$tree>::default();
                for &key in keys {
                    map.insert(key, key.to_string());
                }
                map
            }

            // =================================================================
            // Basic operations
            // =================================================================

            #[rstest]
            fn test_insert_and_count() {
                let mut map = filled(&[5, 3, 7]);
                assert_eq!(map.len(), 3);
                assert!(map.contains_key(&5));
                assert!(!map.contains_key(&99));
            }

            #[rstest]
            fn test_update_existing_key() {
                let mut map = <$tree>::default();
                assert_eq!(map.insert(10, "Initial".to_string()), None);
                assert_eq!(
                    map.insert(10, "Updated".to_string()),
                    Some("Initial".to_string())
                );
                assert_eq!(map.len(), 1);
                assert_eq!(map.value(&10), Ok(&"Updated".to_string()));
            }

            #[rstest]
            fn test_get_present_and_absent() {
                let mut map = filled(&[10]);
                assert_eq!(map.get(&10), Some(&"10".to_string()));
                assert_eq!(map.get(&99), None);
            }

            #[rstest]
            fn test_value_fails_on_missing_key() {
                let mut map = <$tree>::default();
                assert_eq!(map.value(&999), Err(TreeMapError::KeyNotFound));
            }

            #[rstest]
            fn test_min_max() {
                let map = filled(&[5, 3, 7]);
                assert_eq!(map.min(), Ok((&3, &"3".to_string())));
                assert_eq!(map.max(), Ok((&7, &"7".to_string())));
            }

            #[rstest]
            fn test_min_max_on_empty_tree_fail() {
                let map = <$tree>::default();
                assert_eq!(map.min(), Err(TreeMapError::EmptyContainer));
                assert_eq!(map.max(), Err(TreeMapError::EmptyContainer));
            }

            #[rstest]
            fn test_clear() {
                let mut map = filled(&[1, 2]);
                map.clear();
                assert_eq!(map.len(), 0);
                assert!(map.is_empty());
                assert_eq!(map.height(), 0);
                assert!(map.in_order().next().is_none());
                // Clearing an empty map is a no-op.
                map.clear();
                assert_eq!(map.len(), 0);
            }

            #[rstest]
            fn test_keys_and_values_in_ascending_key_order() {
                let mut map = <$tree>::default();
                map.insert(5, "A".to_string());
                map.insert(3, "B".to_string());
                map.insert(7, "C".to_string());

                let keys: Vec<i32> = map.keys().copied().collect();
                let values: Vec<String> = map.values().cloned().collect();
                assert_eq!(keys, vec![3, 5, 7]);
                assert_eq!(values, vec!["B", "A", "C"]);
            }

            // =================================================================
            // Removal
            // =================================================================

            #[rstest]
            fn test_remove_leaf_then_internal_then_root() {
                //      50
                //    /    \
                //  30      70
                //  / \    /  \
                // 20 40  60  80
                let mut map = filled(&[50, 30, 70, 20, 40, 60, 80]);

                // Leaf.
                assert!(map.remove(&20).is_some());
                assert!(!map.contains_key(&20));

                // Internal node, one remaining child in the plain BST case.
                assert!(map.remove(&30).is_some());
                assert!(!map.contains_key(&30));

                // Node with two children (root of the unbalanced shape).
                assert!(map.remove(&50).is_some());
                assert!(!map.contains_key(&50));

                assert_eq!(map.len(), 4);
                assert!(map.is_valid_bst());
                let remaining: Vec<i32> = map.keys().copied().collect();
                assert_eq!(remaining, vec![40, 60, 70, 80]);
            }

            #[rstest]
            fn test_remove_absent_key_is_noop() {
                let mut map = filled(&[5, 3, 7]);
                let before: Vec<i32> = map.keys().copied().collect();

                assert_eq!(map.remove(&42), None);
                assert_eq!(map.len(), 3);
                assert_eq!(map.keys().copied().collect::<Vec<i32>>(), before);
            }

            #[rstest]
            fn test_remove_until_empty() {
                let mut map = filled(&[2, 1, 3]);
                for key in [1, 2, 3] {
                    assert!(map.remove(&key).is_some());
                    assert!(map.is_valid_bst());
                }
                assert!(map.is_empty());
                assert_eq!(map.height(), 0);
            }

            // =================================================================
            // Traversals
            // =================================================================

            #[rstest]
            fn test_forward_traversal_orders() {
                let map = filled(&[10, 5, 15]);

                let in_order: Vec<i32> = map.in_order().map(|(key, _)| *key).collect();
                let pre_order: Vec<i32> = map.pre_order().map(|(key, _)| *key).collect();
                let post_order: Vec<i32> = map.post_order().map(|(key, _)| *key).collect();

                assert_eq!(in_order, vec![5, 10, 15]);
                // Shape-dependent orders hold for every variant here: all
                // five produce root 10 with children 5 and 15 from this
                // insertion sequence... except the splay tree, whose root
                // is the last inserted key. Assert the shape-free part
                // and pin the shaped part through the reversals test on
                // a per-variant basis instead.
                assert_eq!(pre_order.len(), 3);
                assert_eq!(post_order.len(), 3);
            }

            // =================================================================
            // Consistency
            // =================================================================

            #[rstest]
            fn test_round_trip_contains_exactly_inserted_keys() {
                let mut map = <$tree>::default();
                let inserted: Vec<i32> = (0..100).map(|index| (index * 37) % 1000).collect();
                for &key in &inserted {
                    map.insert(key, key.to_string());
                }
                for &key in &inserted {
                    assert!(map.contains_key(&key));
                }
                for key in 1000..1100 {
                    assert!(!map.contains_key(&key));
                }
            }

            #[rstest]
            fn test_random_data_consistency() {
                let mut rng = StdRng::seed_from_u64(123);
                let mut model: BTreeSet<i32> = BTreeSet::new();
                let mut map = <$tree>::default();

                for _ in 0..500 {
                    let key = rng.gen_range(-1000..1000);
                    if model.insert(key) {
                        assert_eq!(map.insert(key, key.to_string()), None);
                    }
                }

                assert_eq!(map.len(), model.len());
                let keys: Vec<i32> = map.keys().copied().collect();
                assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
                assert_eq!(keys, model.iter().copied().collect::<Vec<i32>>());

                let to_remove: Vec<i32> = model.iter().copied().take(250).collect();
                for key in to_remove {
                    assert!(map.remove(&key).is_some(), "failed to remove key {key}");
                    model.remove(&key);
                }

                assert_eq!(map.len(), model.len());
                assert!(map.is_valid_bst());
                assert_eq!(
                    map.keys().copied().collect::<Vec<i32>>(),
                    model.iter().copied().collect::<Vec<i32>>()
                );
            }

            #[rstest]
            fn test_height_of_empty_and_single() {
                let mut map = <$tree>::default();
                assert_eq!(map.height(), 0);
                map.insert(1, "1".to_string());
                assert_eq!(map.height(), 1);
            }

            #[rstest]
            fn test_reference_iteration_is_in_order() {
                let map = filled(&[4, 2, 6, 1, 3]);
                let keys: Vec<i32> = (&map).into_iter().map(|(key, _)| *key).collect();
                assert_eq!(keys, vec![1, 2, 3, 4, 6]);
            }
        }
    };
}

tree_suite!(binary_search_tree, BinarySearchTree<i32, String>);
tree_suite!(avl_tree, AvlTreeMap<i32, String>);
tree_suite!(red_black_tree, RedBlackTreeMap<i32, String>);
tree_suite!(splay_tree, SplayTreeMap<i32, String>);
tree_suite!(treap, TreapMap<i32, String>);

// =============================================================================
// Shaped traversal orders (variants that do not restructure on access)
// =============================================================================

/// The concrete traversal contract from the shape root 10, left 5,
/// right 15. The plain BST builds that shape directly; AVL and
/// red-black settle on it too from this insertion sequence, which keeps
/// the literal expected sequences meaningful for them.
macro_rules! shaped_traversal_suite {
    ($module:ident, $build:expr) => {
        mod $module {
            use super::*;

            #[rstest]
            fn test_six_traversal_orders() {
                let map = $build;
                let keys = |order: Vec<(&i32, &String)>| -> Vec<i32> {
                    order.into_iter().map(|(key, _)| *key).collect()
                };

                assert_eq!(keys(map.in_order().collect()), vec![5, 10, 15]);
                assert_eq!(keys(map.pre_order().collect()), vec![10, 5, 15]);
                assert_eq!(keys(map.post_order().collect()), vec![5, 15, 10]);
                assert_eq!(keys(map.in_order_reverse().collect()), vec![15, 10, 5]);
                assert_eq!(keys(map.pre_order_reverse().collect()), vec![15, 5, 10]);
                assert_eq!(keys(map.post_order_reverse().collect()), vec![10, 15, 5]);
            }
        }
    };
}

fn filled_with<T: Default + Extend<(i32, String)>>(keys: &[i32]) -> T {
    let mut map = T::default();
    map.extend(keys.iter().map(|&key| (key, key.to_string())));
    map
}

shaped_traversal_suite!(
    bst_traversals,
    filled_with::<BinarySearchTree<i32, String>>(&[10, 5, 15])
);
shaped_traversal_suite!(
    avl_traversals,
    filled_with::<AvlTreeMap<i32, String>>(&[10, 5, 15])
);
shaped_traversal_suite!(
    red_black_traversals,
    filled_with::<RedBlackTreeMap<i32, String>>(&[10, 5, 15])
);

// =============================================================================
// Overwrite leaves the shape alone (all variants except splay)
// =============================================================================

macro_rules! overwrite_shape_suite {
    ($module:ident, $tree:ty) => {
        mod $module {
            use super::*;

            #[rstest]
            fn test_overwrite_preserves_shape() {
                let mut map = <$tree>::default();
                for key in [50, 30, 70, 20, 40, 60, 80] {
                    map.insert(key, key.to_string());
                }
                let shape_before: Vec<i32> = map.pre_order().map(|(key, _)| *key).collect();

                assert_eq!(map.insert(40, "overwritten".to_string()), Some("40".to_string()));

                let shape_after: Vec<i32> = map.pre_order().map(|(key, _)| *key).collect();
                assert_eq!(shape_before, shape_after);
                assert_eq!(map.len(), 7);
                assert_eq!(map.value(&40), Ok(&"overwritten".to_string()));
            }
        }
    };
}

overwrite_shape_suite!(bst_overwrite, BinarySearchTree<i32, String>);
overwrite_shape_suite!(avl_overwrite, AvlTreeMap<i32, String>);
overwrite_shape_suite!(red_black_overwrite, RedBlackTreeMap<i32, String>);
overwrite_shape_suite!(treap_overwrite, TreapMap<i32, String>);

// =============================================================================
// AVL shape invariant
// =============================================================================

mod avl_invariants {
    use super::*;

    #[rstest]
    fn test_balanced_after_every_mutation() {
        let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
        for key in 0..200 {
            map.insert(key, key);
            assert!(map.is_height_balanced());
            assert!(map.is_valid_bst());
        }
        for key in (0..200).step_by(2) {
            assert!(map.remove(&key).is_some());
            assert!(map.is_height_balanced());
            assert!(map.is_valid_bst());
        }
    }

    #[rstest]
    fn test_ascending_insertion_keeps_logarithmic_height() {
        let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
        for key in 1..=1024 {
            map.insert(key, key);
        }
        // 1.44 * log2(1024) rounds up to 15; a degenerate chain would be
        // 1024 deep.
        assert!(map.height() <= 15, "height {} too large", map.height());
        assert!(map.is_height_balanced());
    }
}

// =============================================================================
// Red-black shape invariant
// =============================================================================

mod red_black_invariants {
    use super::*;

    #[rstest]
    fn test_valid_after_every_mutation() {
        let mut map: RedBlackTreeMap<i32, i32> = RedBlackTreeMap::new();
        for key in 0..200 {
            map.insert(key, key);
            assert!(map.is_valid_red_black());
            assert!(map.is_valid_bst());
        }
        for key in (0..200).step_by(3) {
            assert!(map.remove(&key).is_some());
            assert!(map.is_valid_red_black());
            assert!(map.is_valid_bst());
        }
    }

    #[rstest]
    fn test_random_workload_stays_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut map: RedBlackTreeMap<i32, i32> = RedBlackTreeMap::new();
        for _ in 0..1000 {
            let key = rng.gen_range(0..128);
            if rng.gen_range(0..3) == 0 {
                map.remove(&key);
            } else {
                map.insert(key, key);
            }
            assert!(map.is_valid_red_black());
        }
        assert!(map.is_valid_bst());
    }
}

// =============================================================================
// Splay behavioral law: accessed key becomes the root
// =============================================================================

mod splay_behavior {
    use super::*;

    #[rstest]
    fn test_accessed_key_moves_to_root() {
        let mut map: SplayTreeMap<i32, String> = SplayTreeMap::new();
        map.insert(10, "Ten".to_string());
        map.insert(20, "Twenty".to_string());
        map.insert(5, "Five".to_string());
        assert_eq!(map.root_key(), Some(&5), "insert must splay");

        assert!(map.contains_key(&20));
        assert_eq!(map.root_key(), Some(&20), "contains_key must splay");

        assert!(map.value(&10).is_ok());
        assert_eq!(map.root_key(), Some(&10), "indexed get must splay");

        assert_eq!(map.get(&5), Some(&"Five".to_string()));
        assert_eq!(map.root_key(), Some(&5), "get must splay");
    }

    #[rstest]
    fn test_overwrite_counts_as_access() {
        let mut map: SplayTreeMap<i32, i32> = SplayTreeMap::new();
        for key in [1, 2, 3, 4, 5] {
            map.insert(key, key);
        }
        map.insert(2, 20);
        assert_eq!(map.root_key(), Some(&2));
        assert_eq!(map.len(), 5);
    }

    #[rstest]
    fn test_failed_lookup_leaves_root_alone() {
        let mut map: SplayTreeMap<i32, i32> = SplayTreeMap::new();
        for key in [1, 2, 3] {
            map.insert(key, key);
        }
        assert_eq!(map.root_key(), Some(&3));
        assert!(!map.contains_key(&42));
        assert_eq!(map.root_key(), Some(&3));
    }

    #[rstest]
    fn test_order_survives_heavy_splaying() {
        let mut map: SplayTreeMap<i32, i32> = SplayTreeMap::new();
        for key in 0..100 {
            map.insert(key, key);
        }
        for key in (0..100).rev() {
            assert!(map.contains_key(&key));
            assert_eq!(map.root_key(), Some(&key));
            assert!(map.is_valid_bst());
        }
    }
}

// =============================================================================
// Treap: heap invariant, determinism, priority stability
// =============================================================================

mod treap_behavior {
    use super::*;

    fn seeded(seed: u64) -> TreapMap<i32, i32> {
        TreapMap::with_strategy(TreapBalance::with_seed(seed))
    }

    #[rstest]
    fn test_heap_ordered_after_every_mutation() {
        let mut map = seeded(99);
        for key in 0..200 {
            map.insert(key, key);
            assert!(map.is_heap_ordered());
            assert!(map.is_valid_bst());
        }
        for key in (0..200).step_by(2) {
            assert!(map.remove(&key).is_some());
            assert!(map.is_heap_ordered());
            assert!(map.is_valid_bst());
        }
    }

    #[rstest]
    fn test_same_seed_same_shape() {
        let shape = |seed: u64| -> Vec<i32> {
            let mut map = seeded(seed);
            for key in [8, 3, 12, 1, 6, 10, 14, 2, 7] {
                map.insert(key, key);
            }
            map.pre_order().map(|(key, _)| *key).collect()
        };
        assert_eq!(shape(42), shape(42));
    }

    #[rstest]
    fn test_priorities_survive_unrelated_operations() {
        let mut map = seeded(5);
        for key in 0..64 {
            map.insert(key, key);
        }
        let shape_before: Vec<i32> = map.pre_order().map(|(key, _)| *key).collect();

        // Lookups and overwrites must not redraw any priority, so the
        // shape stays fixed.
        for key in 0..64 {
            assert!(map.contains_key(&key));
        }
        map.insert(10, 1000);

        let shape_after: Vec<i32> = map.pre_order().map(|(key, _)| *key).collect();
        assert_eq!(shape_before, shape_after);
        assert!(map.is_heap_ordered());
    }

    #[rstest]
    fn test_default_treap_still_behaves() {
        // Entropy-seeded instance: shape is unpredictable, the contract
        // is not.
        let mut map: TreapMap<i32, i32> = TreapMap::new();
        for key in 0..50 {
            map.insert(key, key);
        }
        assert_eq!(map.len(), 50);
        assert!(map.is_heap_ordered());
        assert!(map.is_valid_bst());
        assert_eq!(map.min(), Ok((&0, &0)));
        assert_eq!(map.max(), Ok((&49, &49)));
    }
}
