use std::collections::BTreeMap;

use bplus_engine::BPlusTree;
use proptest::prelude::*;

macro_rules! order_suite {
    ($($order:literal),* $(,)?) => {
        $(
            paste::paste! {
                mod [<order_ $order>] {
                    use super::*;

                    #[test]
                    fn interleaved_inserts_and_deletes() {
                        let mut tree = BPlusTree::new($order).unwrap();
                        let mut reference = BTreeMap::new();

                        // multiplicative walk over 0..257 hits every key once
                        for step in 0..257 {
                            let key = (step * 97) % 257;
                            assert_eq!(tree.insert(key, step), reference.insert(key, step));
                        }
                        tree.validate().unwrap();

                        for key in (0..257).filter(|key| key % 2 == 1) {
                            assert_eq!(tree.remove(&key), reference.remove(&key));
                            tree.validate().unwrap();
                        }

                        assert!(tree.items().eq(reference.iter()));
                        assert_eq!(tree.len(), reference.len());
                    }

                    #[test]
                    fn nodes_stay_within_order() {
                        let mut tree: BPlusTree<i32, i32> = BPlusTree::new($order).unwrap();
                        for key in 0..300 {
                            tree.insert_key(key);
                        }
                        assert!(tree.leaf_sizes().iter().all(|&size| size <= $order));
                        assert!(tree.leaves().skip(1).all(|leaf| leaf.len() >= ($order + 1) / 2));
                    }
                }
            }
        )*
    };
}

order_suite!(2, 3, 4, 5, 7, 16);

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Delete(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..200, any::<u32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        2 => (0u16..200).prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn matches_btreemap(order in 2usize..8, ops in prop::collection::vec(op_strategy(), 1..400)) {
        let mut tree = BPlusTree::new(order).unwrap();
        let mut reference = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(tree.insert(key, value), reference.insert(key, value));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(tree.remove(&key), reference.remove(&key));
                }
            }
            prop_assert!(tree.validate().is_ok(), "{:?}", tree.validate());
        }

        prop_assert!(tree.items().eq(reference.iter()));
        for key in 0u16..200 {
            prop_assert_eq!(tree.search(&key), reference.get(&key));
        }
    }

    #[test]
    fn snapshot_leaves_concatenate_to_sorted_keys(keys in prop::collection::vec(any::<i16>(), 0..200)) {
        let mut tree: BPlusTree<i16, i16> = BPlusTree::new(3).unwrap();
        for &key in &keys {
            tree.insert_key(key);
        }

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();

        let snapshot = tree.snapshot();
        let flattened: Vec<i16> = snapshot.leaf_keys().concat();
        prop_assert_eq!(flattened, expected);
        prop_assert_eq!(snapshot.node_count(), {
            let (leaves, internals) = tree.count_nodes_in_tree();
            leaves + internals
        });
    }
}
