//! DELETE operations for BPlusTree.
//!
//! This module contains the deletion path: recursive removal from the target
//! leaf, underflow handling (borrow from a sibling, otherwise merge with one),
//! and root collapse once an internal root is left with a single child.

use tracing::{debug, trace};

use crate::error::{BPlusTreeError, KeyResult};
use crate::types::{BPlusTree, NodeId, NodeRef};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Remove a key, returning true if it was present.
    ///
    /// Removing an absent key leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let mut tree: BPlusTree<i32, i32> = BPlusTree::new(3).unwrap();
    /// tree.insert_key(4);
    /// assert!(tree.delete(&4));
    /// assert!(!tree.delete(&4));
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Remove a key and return its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.remove_recursive(self.root, key);
        if removed.is_some() {
            self.collapse_root_if_needed();
        }
        removed
    }

    /// Remove a key, returning an error if it is absent.
    pub fn try_remove(&mut self, key: &K) -> KeyResult<V> {
        self.remove(key).ok_or(BPlusTreeError::KeyNotFound)
    }

    fn remove_recursive(&mut self, node: NodeRef<K, V>, key: &K) -> Option<V> {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].remove(key),
            NodeRef::Internal(id, _) => {
                let child_index = self.internal_arena[id].child_index(key);
                let child = self.internal_arena[id].children[child_index];

                let removed = self.remove_recursive(child, key)?;
                if self.is_node_underflow(child) {
                    self.handle_underflow(id, child_index);
                }
                Some(removed)
            }
        }
    }

    fn is_node_underflow(&self, node: NodeRef<K, V>) -> bool {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].is_underflow(self.order),
            NodeRef::Internal(id, _) => self.internal_arena[id].is_underflow(self.order),
        }
    }

    fn can_lend(&self, node: NodeRef<K, V>) -> bool {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].can_lend(self.order),
            NodeRef::Internal(id, _) => self.internal_arena[id].can_lend(self.order),
        }
    }

    /// Restore occupancy of `children[child_index]` of `parent_id`.
    ///
    /// Tried in order: borrow from the left sibling, borrow from the right
    /// sibling, merge into the left sibling, merge the right sibling in.
    fn handle_underflow(&mut self, parent_id: NodeId, child_index: usize) {
        let parent = &self.internal_arena[parent_id];
        let child = parent.children[child_index];
        let left = child_index
            .checked_sub(1)
            .map(|index| parent.children[index]);
        let right = parent.children.get(child_index + 1).copied();

        if let Some(left) = left {
            if self.can_lend(left) {
                self.redistribute(parent_id, left, child, child_index - 1);
                return;
            }
        }

        if let Some(right) = right {
            if self.can_lend(right) {
                self.redistribute(parent_id, child, right, child_index);
                return;
            }
        }

        if left.is_some() {
            self.merge_children(parent_id, child_index - 1);
        } else if right.is_some() {
            self.merge_children(parent_id, child_index);
        }
    }

    /// Move one entry across the boundary at `keys[separator_index]` of the
    /// parent, from the longer of the two siblings to the shorter one.
    fn redistribute(
        &mut self,
        parent_id: NodeId,
        left: NodeRef<K, V>,
        right: NodeRef<K, V>,
        separator_index: usize,
    ) {
        match (left, right) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                if self.leaf_arena[left_id].len() < self.leaf_arena[right_id].len() {
                    let Some((key, value)) = self.leaf_arena[right_id].pop_first() else {
                        unreachable!("lending leaf {} is empty", right_id)
                    };
                    self.leaf_arena[left_id].push_back(key, value);
                } else {
                    let Some((key, value)) = self.leaf_arena[left_id].pop_last() else {
                        unreachable!("lending leaf {} is empty", left_id)
                    };
                    self.leaf_arena[right_id].push_front(key, value);
                }

                let Some(boundary) = self.leaf_arena[right_id].first_key().cloned() else {
                    unreachable!("right leaf {} emptied by redistribution", right_id)
                };
                self.internal_arena[parent_id].keys[separator_index] = boundary;
                trace!(parent = parent_id, left = left_id, right = right_id, "leaf redistribution");
            }
            (NodeRef::Internal(left_id, _), NodeRef::Internal(right_id, _)) => {
                if self.internal_arena[left_id].len() < self.internal_arena[right_id].len() {
                    let Some((key, child)) = self.internal_arena[right_id].pop_first() else {
                        unreachable!("lending internal node {} is empty", right_id)
                    };
                    let separator = std::mem::replace(
                        &mut self.internal_arena[parent_id].keys[separator_index],
                        key,
                    );
                    self.internal_arena[left_id].push_back(separator, child);
                } else {
                    let Some((key, child)) = self.internal_arena[left_id].pop_last() else {
                        unreachable!("lending internal node {} is empty", left_id)
                    };
                    let separator = std::mem::replace(
                        &mut self.internal_arena[parent_id].keys[separator_index],
                        key,
                    );
                    self.internal_arena[right_id].push_front(separator, child);
                }
                trace!(parent = parent_id, left = left_id, right = right_id, "internal redistribution");
            }
            _ => unreachable!("siblings at different depths under node {}", parent_id),
        }
    }

    /// Merge `children[left_index + 1]` into `children[left_index]` and drop
    /// the separator between them from the parent.
    fn merge_children(&mut self, parent_id: NodeId, left_index: usize) {
        let left = self.internal_arena[parent_id].children[left_index];
        let (separator, right) = self.internal_arena[parent_id].remove_child(left_index);

        match (left, right) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                let Some(right_node) = self.leaf_arena.deallocate(right_id) else {
                    unreachable!("merged leaf {} missing from arena", right_id)
                };
                self.leaf_arena[left_id].merge_from(right_node);
                trace!(parent = parent_id, left = left_id, right = right_id, "leaf merge");
            }
            (NodeRef::Internal(left_id, _), NodeRef::Internal(right_id, _)) => {
                let Some(right_node) = self.internal_arena.deallocate(right_id) else {
                    unreachable!("merged internal node {} missing from arena", right_id)
                };
                self.internal_arena[left_id].merge_from(separator, right_node);
                trace!(parent = parent_id, left = left_id, right = right_id, "internal merge");
            }
            _ => unreachable!("siblings at different depths under node {}", parent_id),
        }
    }

    /// Replace an internal root that has a single child by that child.
    ///
    /// A leaf root is never collapsed, however sparse.
    fn collapse_root_if_needed(&mut self) {
        while let NodeRef::Internal(root_id, _) = self.root {
            let root = &self.internal_arena[root_id];
            if root.children.len() != 1 {
                break;
            }
            let only_child = root.children[0];
            self.internal_arena.deallocate(root_id);
            self.root = only_child;
            debug!(old_root = root_id, new_root = only_child.id(), "root collapsed, tree shrank one level");
        }
    }
}
