//! GET operations for BPlusTree.
//!
//! This module contains the read operations for the B+ tree: key lookup,
//! value retrieval, first/last entries and checked arena accessors.

use crate::error::{BPlusTreeError, KeyResult};
use crate::types::{BPlusTree, InternalNode, LeafNode, NodeId, NodeRef};

impl<K: Ord, V> BPlusTree<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.search(&1), Some(&"one"));
    /// assert_eq!(tree.search(&2), None);
    /// ```
    pub fn search(&self, key: &K) -> Option<&V> {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id].search(key)
    }

    /// Get a mutable reference to the value associated with a key.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id].search_mut(key)
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Get value for a key, returning an error if the key doesn't exist.
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get_item(&1).unwrap(), &"one");
    /// assert!(tree.get_item(&2).is_err());
    /// ```
    pub fn get_item(&self, key: &K) -> KeyResult<&V> {
        self.search(key).ok_or(BPlusTreeError::KeyNotFound)
    }

    /// Returns the smallest key-value pair in the tree.
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = &self.leaf_arena[self.leftmost_leaf_id()];
        Some((leaf.keys.first()?, leaf.values.first()?))
    }

    /// Returns the largest key-value pair in the tree.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = &self.leaf_arena[self.rightmost_leaf_id()];
        Some((leaf.keys.last()?, leaf.values.last()?))
    }

    // ============================================================================
    // NAVIGATION HELPERS
    // ============================================================================

    /// Descend from the root to the leaf whose key range covers `key`.
    pub(crate) fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return id,
                NodeRef::Internal(id, _) => current = self.internal_arena[id].child_for(key),
            }
        }
    }
}

impl<K, V> BPlusTree<K, V> {
    /// Get the ID of the first (leftmost) leaf in the tree.
    pub(crate) fn leftmost_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return id,
                NodeRef::Internal(id, _) => current = self.internal_arena[id].children[0],
            }
        }
    }

    /// Get the ID of the last (rightmost) leaf in the tree.
    pub(crate) fn rightmost_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return id,
                NodeRef::Internal(id, _) => {
                    let children = &self.internal_arena[id].children;
                    current = children[children.len() - 1];
                }
            }
        }
    }

    /// The first key reachable from `node` by always taking the leftmost
    /// child. For an internal node this is the smallest key of its subtree.
    pub fn first_key_of(&self, node: NodeRef<K, V>) -> Option<&K> {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena.get(id)?.keys.first(),
            NodeRef::Internal(id, _) => {
                let child = *self.internal_arena.get(id)?.children.first()?;
                self.first_key_of(child)
            }
        }
    }

    /// The smallest key in the tree, found through the root.
    pub fn first_leaf_key(&self) -> Option<&K> {
        self.first_key_of(self.root)
    }

    // ============================================================================
    // CHECKED ARENA ACCESS
    // ============================================================================

    /// Get a leaf node by id.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get an internal node by id.
    pub fn get_internal(&self, id: NodeId) -> Option<&InternalNode<K, V>> {
        self.internal_arena.get(id)
    }

    /// The current root reference.
    pub fn root(&self) -> NodeRef<K, V> {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use crate::types::BPlusTree;

    #[test]
    fn test_search_across_levels() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..50 {
            tree.insert(key, key * 2);
        }
        for key in 0..50 {
            assert_eq!(tree.search(&key), Some(&(key * 2)));
        }
        assert_eq!(tree.search(&-1), None);
        assert_eq!(tree.search(&50), None);
        assert!(tree.contains_key(&49));
        assert!(!tree.contains_key(&51));
    }

    #[test]
    fn test_search_mut_updates_value() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..10 {
            tree.insert(key, key);
        }
        if let Some(value) = tree.search_mut(&7) {
            *value = 70;
        }
        assert_eq!(tree.search(&7), Some(&70));
        assert!(tree.search_mut(&11).is_none());
    }

    #[test]
    fn test_first_and_last() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new(3).unwrap();
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.first_leaf_key(), None);

        for key in [40, 10, 30, 20, 50, 60] {
            tree.insert_key(key);
        }
        assert_eq!(tree.first(), Some((&10, &10)));
        assert_eq!(tree.last(), Some((&60, &60)));
        assert_eq!(tree.first_leaf_key(), Some(&10));
    }

    #[test]
    fn test_first_key_of_subtree() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new(2).unwrap();
        for key in 0..20 {
            tree.insert_key(key);
        }
        let root = tree.get_internal(tree.root().id()).unwrap();
        let right = root.children()[1];
        // the right subtree starts at or after the root's first separator
        assert!(tree.first_key_of(right).unwrap() >= &root.keys()[0]);
    }
}
