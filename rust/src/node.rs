//! Node implementations for BPlusTree.
//!
//! This module contains the node-local halves of every operation: searching,
//! inserting, splitting, removing, lending and merging inside a single
//! `LeafNode` or `InternalNode`. Anything that touches more than one node
//! (allocation, relinking, parent separators) lives in the tree-level
//! operation modules.
//!
//! Nodes do not store the order. It is passed in by the tree, which holds the
//! only copy.

use crate::types::{InternalNode, LeafNode, NodeId, NodeRef};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord, V> LeafNode<K, V> {
    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Get a value by key from this leaf node.
    pub fn search(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Get a mutable reference to a value by key from this leaf node.
    pub fn search_mut(&mut self, key: &K) -> Option<&mut V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &mut self.values[index])
    }

    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf node is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get a reference to the keys in this leaf node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get a reference to the values in this leaf node.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Next leaf in the chain, `NULL_NODE` if this is the last one.
    pub fn next(&self) -> NodeId {
        self.next
    }

    /// The smallest key in this leaf. Only an empty root leaf returns `None`.
    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a key-value pair in sorted position.
    ///
    /// An existing key keeps its slot and has its value replaced; the old value
    /// is returned. The caller checks `is_full` beforehand: a full leaf that
    /// gains a new key holds one overflow key and must be split.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.keys.binary_search(&key) {
            Ok(index) => Some(std::mem::replace(&mut self.values[index], value)),
            Err(index) => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                None
            }
        }
    }

    /// Split this leaf, returning the new right node.
    ///
    /// The right node takes the upper half (from `ceil(len / 2)`) and this
    /// leaf's `next` link. The caller allocates it and points `self.next` at
    /// the new id.
    pub fn split(&mut self) -> LeafNode<K, V> {
        let mid = self.keys.len().div_ceil(2);

        let right_keys = self.keys.split_off(mid);
        let right_values = self.values.split_off(mid);

        LeafNode::with_data(right_keys, right_values, self.next)
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove a key-value pair from this leaf node.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                Some(self.values.remove(index))
            }
            Err(_) => None,
        }
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this leaf holds `order` keys, so the next new key
    /// forces a split.
    pub fn is_full(&self, order: usize) -> bool {
        self.keys.len() >= order
    }

    /// Returns true if this leaf is below minimum occupancy.
    pub fn is_underflow(&self, order: usize) -> bool {
        self.keys.len() < Self::min_keys(order)
    }

    /// Returns true if this leaf can give one entry to a sibling.
    pub fn can_lend(&self, order: usize) -> bool {
        self.keys.len() > Self::min_keys(order)
    }

    /// Minimum number of keys a non-root leaf holds: `ceil(order / 2)`.
    pub fn min_keys(order: usize) -> usize {
        order.div_ceil(2)
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last entry (this leaf is the left sibling).
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    /// Take the first entry (this leaf is the right sibling).
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.values.remove(0)))
    }

    /// Accept an entry from the left sibling.
    pub(crate) fn push_front(&mut self, key: K, value: V) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    /// Accept an entry from the right sibling.
    pub(crate) fn push_back(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Append the right sibling's entries and adopt its `next` link.
    pub(crate) fn merge_from(&mut self, mut right: LeafNode<K, V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
        self.next = right.next;
    }
}

// ============================================================================
// INTERNAL NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord, V> InternalNode<K, V> {
    /// Index of the child whose subtree must contain `key`: the smallest `i`
    /// with `key < keys[i]`, or the last child.
    pub fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|separator| separator <= key)
    }

    /// The child that must contain `key`.
    pub fn child_for(&self, key: &K) -> NodeRef<K, V> {
        self.children[self.child_index(key)]
    }

    /// Returns the number of separator keys in this node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no separators.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Separator keys.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child references, one more than `keys`.
    pub fn children(&self) -> &[NodeRef<K, V>] {
        &self.children
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Store a promoted separator and the new right sibling of `children[index]`.
    pub(crate) fn insert_child(&mut self, index: usize, separator: K, sibling: NodeRef<K, V>) {
        self.keys.insert(index, separator);
        self.children.insert(index + 1, sibling);
    }

    /// Split this node, returning the new right node and the promoted key.
    ///
    /// With `split = ceil(len / 2)` this node keeps `keys[..split - 1]` and
    /// `children[..split]`, the right node takes `keys[split..]` and
    /// `children[split..]`, and `keys[split - 1]` moves up to the parent.
    pub fn split(&mut self) -> (InternalNode<K, V>, K) {
        let split = self.keys.len().div_ceil(2);

        let right_keys = self.keys.split_off(split);
        let right_children = self.children.split_off(split);

        let promoted = match self.keys.pop() {
            Some(key) => key,
            None => unreachable!("split of an internal node with no keys"),
        };

        (InternalNode::with_data(right_keys, right_children), promoted)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this node holds `order` separators, so the next
    /// promoted separator forces a split.
    pub fn is_full(&self, order: usize) -> bool {
        self.keys.len() >= order
    }

    /// Returns true if this node is below minimum occupancy.
    pub fn is_underflow(&self, order: usize) -> bool {
        self.keys.len() < Self::min_keys(order)
    }

    /// Returns true if this node can give one child to a sibling.
    pub fn can_lend(&self, order: usize) -> bool {
        self.keys.len() > Self::min_keys(order)
    }

    /// Minimum number of separators a non-root internal node holds.
    ///
    /// Occupancy is counted in children, `ceil((order + 1) / 2)`, which is
    /// `floor(order / 2)` keys. A split promotes one key out of `order + 1`,
    /// so for odd orders one half always ends up with `floor(order / 2)`.
    pub fn min_keys(order: usize) -> usize {
        order / 2
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Take the last separator and last child (this node is the left sibling).
    pub(crate) fn pop_last(&mut self) -> Option<(K, NodeRef<K, V>)> {
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Take the first separator and first child (this node is the right sibling).
    pub(crate) fn pop_first(&mut self) -> Option<(K, NodeRef<K, V>)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Accept the parent's separator and a child from the left sibling.
    pub(crate) fn push_front(&mut self, separator: K, child: NodeRef<K, V>) {
        self.keys.insert(0, separator);
        self.children.insert(0, child);
    }

    /// Accept the parent's separator and a child from the right sibling.
    pub(crate) fn push_back(&mut self, separator: K, child: NodeRef<K, V>) {
        self.keys.push(separator);
        self.children.push(child);
    }

    /// Pull down the parent's separator and append the right sibling.
    pub(crate) fn merge_from(&mut self, separator: K, mut right: InternalNode<K, V>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }

    /// Drop the separator at `index` and the child to its right.
    pub(crate) fn remove_child(&mut self, index: usize) -> (K, NodeRef<K, V>) {
        (self.keys.remove(index), self.children.remove(index + 1))
    }
}
