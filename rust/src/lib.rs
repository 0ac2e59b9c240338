//! In-memory B+ tree with a tree-wide order.
//!
//! Keys and values live only in leaves, which are chained left to right in
//! ascending key order. Internal nodes hold separator keys that route
//! searches: a key equal to a separator belongs to the right-hand subtree.
//! Insertion splits nodes that overflow and promotes a new root when the old
//! root splits; deletion rebalances underfull nodes by borrowing from or
//! merging with a sibling and collapses a root left with a single child.
//!
//! Nodes are stored in two arenas and addressed by [`NodeId`]. The whole tree
//! can be exported as an owned [`NodeSnapshot`] for rendering.
//!
//! ```
//! use bplus_engine::{BPlusTree, NodeKind};
//!
//! let mut tree = BPlusTree::new(3).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key, key.to_string());
//! }
//! assert_eq!(tree.search(&12).map(String::as_str), Some("12"));
//!
//! assert!(tree.delete(&20));
//! let root = tree.snapshot();
//! assert_eq!(root.kind, NodeKind::Internal);
//! assert_eq!(root.keys, vec![10, 17]);
//! assert!(tree.validate().is_ok());
//! ```

mod compact_arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod snapshot;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::validate_order;
pub use error::{BPlusTreeError, BTreeResult, InitResult, KeyResult};
pub use iteration::{ItemIterator, KeyIterator, LeafIterator, ValueIterator};
pub use snapshot::{NodeKind, NodeSnapshot};
pub use types::{
    BPlusTree, InternalNode, LeafNode, NodeId, NodeRef, DEFAULT_ORDER, MIN_ORDER, NULL_NODE,
};
