//! Core types and data structures for BPlusTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree implementation.

use std::marker::PhantomData;

use crate::compact_arena::CompactArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest order a tree accepts.
pub const MIN_ORDER: usize = 2;

/// Order used by `with_default_order` and `Default`.
pub const DEFAULT_ORDER: usize = 3;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel for "no node" (end of the leaf chain).
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// B+ tree with a tree-wide order.
///
/// All values live in leaves; leaves are chained left to right in ascending
/// key order. Internal nodes only hold separator keys and child references.
/// The order is fixed at construction and shared by every node: nodes carry
/// no capacity of their own and receive the order from the tree on each call.
///
/// # Examples
///
/// ```
/// use bplus_engine::BPlusTree;
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// for key in [10, 20, 5, 6] {
///     tree.insert_key(key);
/// }
///
/// assert_eq!(tree.search(&6), Some(&6));
/// assert_eq!(tree.search(&99), None);
/// assert!(!tree.is_leaf_root());
/// ```
#[derive(Debug)]
pub struct BPlusTree<K, V> {
    /// Maximum number of keys a node holds between operations.
    pub(crate) order: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef<K, V>,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    /// Arena storage for internal nodes.
    pub(crate) internal_arena: CompactArena<InternalNode<K, V>>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// Values, index-aligned with `keys`.
    pub(crate) values: Vec<V>,
    /// Next leaf in key order, or `NULL_NODE` for the last leaf.
    pub(crate) next: NodeId,
}

/// Internal node containing separator keys and child references.
#[derive(Debug, Clone)]
pub struct InternalNode<K, V> {
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes; always one more than `keys`.
    pub(crate) children: Vec<NodeRef<K, V>>,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Node reference that can be either a leaf or an internal node
#[derive(Debug, PartialEq, Eq)]
pub enum NodeRef<K, V> {
    Leaf(NodeId, PhantomData<(K, V)>),
    Internal(NodeId, PhantomData<(K, V)>),
}

impl<K, V> Clone for NodeRef<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<K, V> {}

impl<K, V> NodeRef<K, V> {
    /// Reference to the leaf stored under `id`.
    pub fn leaf(id: NodeId) -> Self {
        NodeRef::Leaf(id, PhantomData)
    }

    /// Reference to the internal node stored under `id`.
    pub fn internal(id: NodeId) -> Self {
        NodeRef::Internal(id, PhantomData)
    }

    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id, _) => id,
            NodeRef::Internal(id, _) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_, _))
    }
}

/// Result of an insertion into a subtree.
pub(crate) enum InsertResult<K, V> {
    /// The subtree absorbed the entry. Carries the overwritten value, if any.
    Updated(Option<V>),
    /// The subtree's top node split. `sibling` is the new right node and
    /// `separator` the key the parent must store in front of it.
    Split { sibling: NodeRef<K, V>, separator: K },
}
