//! Iterator implementations for BPlusTree.
//!
//! All iterators walk the leaf chain from the leftmost leaf, so they also
//! exercise the `next` links rather than the tree structure.

use crate::types::{BPlusTree, LeafNode, NULL_NODE};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-value pairs in the B+ tree using the leaf linked list.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    current_leaf: Option<&'a LeafNode<K, V>>,
    current_index: usize,
}

/// Iterator over keys in the B+ tree.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in the B+ tree.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the leaves themselves, in chain order.
pub struct LeafIterator<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    current_leaf: Option<&'a LeafNode<K, V>>,
}

// ============================================================================
// BPLUSTREE ITERATOR METHODS
// ============================================================================

impl<K, V> BPlusTree<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for key in [3, 1, 2] {
    ///     tree.insert(key, key * 10);
    /// }
    /// let items: Vec<_> = tree.items().collect();
    /// assert_eq!(items, [(&1, &10), (&2, &20), (&3, &30)]);
    /// ```
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over the leaves in chain order.
    pub fn leaves(&self) -> LeafIterator<'_, K, V> {
        LeafIterator {
            tree: self,
            current_leaf: self.leaf_arena.get(self.leftmost_leaf_id()),
        }
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> ItemIterator<'a, K, V> {
    pub fn new(tree: &'a BPlusTree<K, V>) -> Self {
        Self {
            tree,
            current_leaf: tree.leaf_arena.get(tree.leftmost_leaf_id()),
            current_index: 0,
        }
    }
}

impl<'a, K, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;

            if let (Some(key), Some(value)) = (
                leaf.keys.get(self.current_index),
                leaf.values.get(self.current_index),
            ) {
                self.current_index += 1;
                return Some((key, value));
            }

            // Leaf exhausted, follow the chain
            self.current_leaf = if leaf.next == NULL_NODE {
                None
            } else {
                self.tree.leaf_arena.get(leaf.next)
            };
            self.current_index = 0;
        }
    }
}

impl<'a, K, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(key, _)| key)
    }
}

impl<'a, K, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, value)| value)
    }
}

impl<'a, K, V> Iterator for LeafIterator<'a, K, V> {
    type Item = &'a LeafNode<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.current_leaf?;
        self.current_leaf = self.tree.leaf_arena.get(leaf.next);
        Some(leaf)
    }
}

impl<'a, K, V> IntoIterator for &'a BPlusTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = ItemIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}
