//! Construction and initialization logic for BPlusTree and nodes.
//!
//! This module contains order validation, arena initialization, and default
//! implementations.

use crate::compact_arena::CompactArena;
use crate::error::{BPlusTreeError, InitResult};
use crate::types::{BPlusTree, InternalNode, LeafNode, NodeRef, DEFAULT_ORDER, MIN_ORDER, NULL_NODE};

impl<K, V> BPlusTree<K, V> {
    /// Create a B+ tree with the specified order.
    ///
    /// # Arguments
    ///
    /// * `order` - Maximum number of keys per node (minimum 2)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BPlusTree)` if the order is valid, `Err(BPlusTreeError)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_engine::BPlusTree;
    ///
    /// let tree = BPlusTree::<i32, String>::new(4).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusTree::<i32, String>::new(1).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        validate_order(order)?;
        Ok(Self::with_valid_order(order))
    }

    /// Create a B+ tree with the default order (3).
    pub fn with_default_order() -> Self {
        Self::with_valid_order(DEFAULT_ORDER)
    }

    fn with_valid_order(order: usize) -> Self {
        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(order));

        Self {
            order,
            root: NodeRef::leaf(root_id),
            leaf_arena,
            internal_arena: CompactArena::new(),
        }
    }

    /// The order this tree was built with.
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates an empty leaf with room for one overflow key past `order`.
    pub fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order + 1),
            values: Vec::with_capacity(order + 1),
            next: NULL_NODE,
        }
    }

    /// Creates a leaf from already sorted, index-aligned data.
    pub(crate) fn with_data(keys: Vec<K>, values: Vec<V>, next: crate::types::NodeId) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values, next }
    }
}

impl<K, V> InternalNode<K, V> {
    /// Creates an empty internal node.
    pub fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order + 1),
            children: Vec::with_capacity(order + 2),
        }
    }

    /// Creates an internal node from separators and children.
    pub(crate) fn with_data(keys: Vec<K>, children: Vec<NodeRef<K, V>>) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self { keys, children }
    }
}

// Default implementations
impl<K, V> Default for BPlusTree<K, V> {
    fn default() -> Self {
        Self::with_default_order()
    }
}

// Freed arena slots are reset to these.
impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            next: NULL_NODE,
        }
    }
}

impl<K, V> Default for InternalNode<K, V> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Validate that an order is usable for a tree.
pub fn validate_order(order: usize) -> InitResult<()> {
    if order < MIN_ORDER {
        Err(BPlusTreeError::invalid_order(order, MIN_ORDER))
    } else {
        Ok(())
    }
}
