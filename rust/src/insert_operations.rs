//! INSERT operations for BPlusTree.
//!
//! This module contains the insertion path: recursive descent to the target
//! leaf, node splitting with arena allocation, separator promotion, and root
//! promotion when the old root splits.

use tracing::{debug, trace};

use crate::types::{BPlusTree, InsertResult, InternalNode, NodeId, NodeRef};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Insert a key-value pair into the tree.
    ///
    /// If the key is already present its value is overwritten in place and the
    /// previous value is returned; the tree's shape does not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// assert_eq!(tree.insert(1, "one"), None);
    /// assert_eq!(tree.insert(1, "uno"), Some("one"));
    /// assert_eq!(tree.search(&1), Some(&"uno"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.insert_recursive(self.root, key, value) {
            InsertResult::Updated(old_value) => old_value,
            InsertResult::Split { sibling, separator } => {
                self.promote_root(separator, sibling);
                None
            }
        }
    }

    /// Insert a key whose value is the key itself.
    pub fn insert_key(&mut self, key: K) -> Option<V>
    where
        K: Into<V>,
    {
        let value = key.clone().into();
        self.insert(key, value)
    }

    /// Make a new internal root over the old root and its new right sibling.
    fn promote_root(&mut self, separator: K, sibling: NodeRef<K, V>) {
        let old_root = self.root;
        let new_root = InternalNode::with_data(vec![separator], vec![old_root, sibling]);
        let new_root_id = self.internal_arena.allocate(new_root);
        self.root = NodeRef::internal(new_root_id);

        debug!(
            root = new_root_id,
            left = old_root.id(),
            right = sibling.id(),
            "root split, tree grew one level"
        );
    }

    fn insert_recursive(&mut self, node: NodeRef<K, V>, key: K, value: V) -> InsertResult<K, V> {
        let order = self.order;
        match node {
            NodeRef::Leaf(id, _) => {
                let leaf = &mut self.leaf_arena[id];
                let was_full = leaf.is_full(order);
                match leaf.insert(key, value) {
                    None if was_full => self.split_leaf(id),
                    old_value => InsertResult::Updated(old_value),
                }
            }
            NodeRef::Internal(id, _) => {
                let child_index = self.internal_arena[id].child_index(&key);
                let child = self.internal_arena[id].children[child_index];

                match self.insert_recursive(child, key, value) {
                    InsertResult::Updated(old_value) => InsertResult::Updated(old_value),
                    InsertResult::Split { sibling, separator } => {
                        let node = &mut self.internal_arena[id];
                        let was_full = node.is_full(order);
                        node.insert_child(child_index, separator, sibling);
                        if was_full {
                            self.split_internal(id)
                        } else {
                            InsertResult::Updated(None)
                        }
                    }
                }
            }
        }
    }

    /// Split an overflowing leaf and splice the new right half into the chain.
    fn split_leaf(&mut self, id: NodeId) -> InsertResult<K, V> {
        let right = self.leaf_arena[id].split();
        let separator = match right.first_key() {
            Some(key) => key.clone(),
            None => unreachable!("leaf split produced an empty right half"),
        };

        let right_id = self.leaf_arena.allocate(right);
        self.leaf_arena[id].next = right_id;

        trace!(left = id, right = right_id, "leaf split");
        InsertResult::Split {
            sibling: NodeRef::leaf(right_id),
            separator,
        }
    }

    /// Split an overflowing internal node; the middle separator moves up.
    fn split_internal(&mut self, id: NodeId) -> InsertResult<K, V> {
        let (right, promoted) = self.internal_arena[id].split();
        let right_id = self.internal_arena.allocate(right);

        trace!(left = id, right = right_id, "internal split");
        InsertResult::Split {
            sibling: NodeRef::internal(right_id),
            separator: promoted,
        }
    }
}
