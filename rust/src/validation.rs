//! Validation and debugging utilities for BPlusTree.
//!
//! The checker walks the tree from the outside and reports the first broken
//! invariant as an error instead of panicking, so tests can assert on it.

use std::collections::HashSet;
use std::fmt::{self, Debug, Write};

use crate::error::{BPlusTreeError, BTreeResult, TreeResult};
use crate::types::{BPlusTree, InternalNode, LeafNode, NodeId, NodeRef, NULL_NODE};

/// Exclusive-upper / inclusive-lower key bounds for a subtree.
struct Bounds<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Check if the tree maintains B+ tree invariants.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check every structural invariant, reporting the first violation.
    ///
    /// Covered: strictly ascending keys in every node, `children = keys + 1`,
    /// separator bounds, at most `order` keys per node, minimum occupancy for
    /// non-root nodes, all leaves at one depth, a leaf chain that visits every
    /// leaf once in ascending key order, and arena/tree node-count agreement.
    pub fn validate(&self) -> BTreeResult<()> {
        let mut leaf_depth = None;
        let mut tree_leaves = Vec::new();
        let root_bounds = Bounds {
            lower: None,
            upper: None,
        };
        self.check_node(self.root, root_bounds, true, 1, &mut leaf_depth, &mut tree_leaves)?;
        self.check_leaf_chain(&tree_leaves)?;
        self.check_arena_tree_consistency()
    }

    fn check_node<'a>(
        &'a self,
        node: NodeRef<K, V>,
        bounds: Bounds<'a, K>,
        is_root: bool,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        tree_leaves: &mut Vec<NodeId>,
    ) -> TreeResult<()> {
        match node {
            NodeRef::Leaf(id, _) => {
                let leaf = self.leaf_arena.get(id).ok_or_else(|| {
                    BPlusTreeError::corrupted_tree("Leaf", &format!("node {} not allocated", id))
                })?;
                self.check_leaf(id, leaf, &bounds, is_root)?;

                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(BPlusTreeError::data_integrity(
                            "Balance",
                            &format!("leaf {} at depth {}, expected {}", id, depth, expected),
                        ));
                    }
                    Some(_) => {}
                }
                tree_leaves.push(id);
                Ok(())
            }
            NodeRef::Internal(id, _) => {
                let internal = self.internal_arena.get(id).ok_or_else(|| {
                    BPlusTreeError::corrupted_tree("Internal", &format!("node {} not allocated", id))
                })?;
                self.check_internal(id, internal, &bounds, is_root)?;

                for (i, &child) in internal.children.iter().enumerate() {
                    let child_bounds = Bounds {
                        lower: if i == 0 { bounds.lower } else { internal.keys.get(i - 1) },
                        upper: if i == internal.keys.len() { bounds.upper } else { internal.keys.get(i) },
                    };
                    self.check_node(child, child_bounds, false, depth + 1, leaf_depth, tree_leaves)?;
                }
                Ok(())
            }
        }
    }

    fn check_leaf(
        &self,
        id: NodeId,
        leaf: &LeafNode<K, V>,
        bounds: &Bounds<'_, K>,
        is_root: bool,
    ) -> TreeResult<()> {
        let fail = |details: String| Err(BPlusTreeError::data_integrity(&format!("Leaf {}", id), &details));

        if leaf.keys.len() != leaf.values.len() {
            return fail(format!("{} keys but {} values", leaf.keys.len(), leaf.values.len()));
        }
        if !strictly_ascending(&leaf.keys) {
            return fail("keys not strictly ascending".to_string());
        }
        if leaf.keys.len() > self.order {
            return fail(format!("{} keys exceeds order {}", leaf.keys.len(), self.order));
        }
        if !is_root && leaf.is_underflow(self.order) {
            return fail(format!("underflow with {} keys", leaf.keys.len()));
        }
        if !within_bounds(&leaf.keys, bounds) {
            return fail("key outside separator bounds".to_string());
        }
        Ok(())
    }

    fn check_internal(
        &self,
        id: NodeId,
        internal: &InternalNode<K, V>,
        bounds: &Bounds<'_, K>,
        is_root: bool,
    ) -> TreeResult<()> {
        let fail =
            |details: String| Err(BPlusTreeError::data_integrity(&format!("Internal {}", id), &details));

        if internal.keys.len() + 1 != internal.children.len() {
            return fail(format!(
                "{} keys but {} children",
                internal.keys.len(),
                internal.children.len()
            ));
        }
        if internal.keys.is_empty() {
            return fail("no separator keys".to_string());
        }
        if !strictly_ascending(&internal.keys) {
            return fail("keys not strictly ascending".to_string());
        }
        if internal.keys.len() > self.order {
            return fail(format!("{} keys exceeds order {}", internal.keys.len(), self.order));
        }
        if !is_root && internal.is_underflow(self.order) {
            return fail(format!("underflow with {} keys", internal.keys.len()));
        }
        if !within_bounds(&internal.keys, bounds) {
            return fail("separator outside parent bounds".to_string());
        }
        Ok(())
    }

    /// Walk the `next` links and compare with the leaves found structurally.
    fn check_leaf_chain(&self, tree_leaves: &[NodeId]) -> TreeResult<()> {
        let mut chain = Vec::with_capacity(tree_leaves.len());
        let mut seen = HashSet::new();
        let mut previous_key: Option<&K> = None;
        let mut current = self.leftmost_leaf_id();

        while current != NULL_NODE {
            if !seen.insert(current) {
                return Err(BPlusTreeError::corrupted_tree(
                    "Leaf chain",
                    &format!("cycle through leaf {}", current),
                ));
            }
            let leaf = self.leaf_arena.get(current).ok_or_else(|| {
                BPlusTreeError::corrupted_tree(
                    "Leaf chain",
                    &format!("link to unallocated leaf {}", current),
                )
            })?;

            for key in &leaf.keys {
                if previous_key.is_some_and(|previous| previous >= key) {
                    return Err(BPlusTreeError::corrupted_tree(
                        "Leaf chain",
                        &format!("keys out of order in leaf {}", current),
                    ));
                }
                previous_key = Some(key);
            }

            chain.push(current);
            current = leaf.next;
        }

        if chain != tree_leaves {
            return Err(BPlusTreeError::corrupted_tree(
                "Leaf chain",
                &format!("tree has {:?}, chain has {:?}", tree_leaves, chain),
            ));
        }
        Ok(())
    }

    /// Check that arena allocation matches tree structure.
    fn check_arena_tree_consistency(&self) -> TreeResult<()> {
        let (tree_leaves, tree_internals) = self.count_nodes_in_tree();
        let arena_leaves = self.leaf_arena.stats().allocated_count;
        let arena_internals = self.internal_arena.stats().allocated_count;

        if tree_leaves != arena_leaves {
            return Err(BPlusTreeError::data_integrity(
                "Leaf arena",
                &format!("{} in tree vs {} in arena", tree_leaves, arena_leaves),
            ));
        }
        if tree_internals != arena_internals {
            return Err(BPlusTreeError::data_integrity(
                "Internal arena",
                &format!("{} in tree vs {} in arena", tree_internals, arena_internals),
            ));
        }
        Ok(())
    }

    // ============================================================================
    // DEBUGGING UTILITIES
    // ============================================================================

    /// Returns the sizes of all leaf nodes, left to right.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        self.leaves().map(|leaf| leaf.keys.len()).collect()
    }

    /// Multi-line dump of the node structure with arena ids.
    pub fn debug_structure(&self) -> String
    where
        K: Debug,
    {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_node(self.root, 0, &mut out);
        out
    }

    fn write_node(&self, node: NodeRef<K, V>, depth: usize, out: &mut String) -> fmt::Result
    where
        K: Debug,
    {
        let indent = "  ".repeat(depth);
        match node {
            NodeRef::Leaf(id, _) => match self.leaf_arena.get(id) {
                Some(leaf) => writeln!(out, "{}Leaf[id={}, next={}]: {:?}", indent, id, leaf.next, leaf.keys),
                None => writeln!(out, "{}Leaf[id={}]: <missing>", indent, id),
            },
            NodeRef::Internal(id, _) => match self.internal_arena.get(id) {
                Some(internal) => {
                    writeln!(out, "{}Internal[id={}]: {:?}", indent, id, internal.keys)?;
                    for &child in &internal.children {
                        self.write_node(child, depth + 1, out)?;
                    }
                    Ok(())
                }
                None => writeln!(out, "{}Internal[id={}]: <missing>", indent, id),
            },
        }
    }
}

fn strictly_ascending<K: Ord>(keys: &[K]) -> bool {
    keys.windows(2).all(|pair| pair[0] < pair[1])
}

fn within_bounds<K: Ord>(keys: &[K], bounds: &Bounds<'_, K>) -> bool {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return true;
    };
    bounds.lower.map_or(true, |lower| first >= lower)
        && bounds.upper.map_or(true, |upper| last < upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> BPlusTree<i32, i32> {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..40 {
            tree.insert_key(key);
        }
        tree
    }

    #[test]
    fn test_valid_tree_passes() {
        let tree = sample_tree();
        assert!(tree.check_invariants());
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.leaf_sizes().iter().sum::<usize>(), 40);
    }

    #[test]
    fn test_detects_unsorted_leaf() {
        let mut tree = sample_tree();
        let leaf_id = tree.leftmost_leaf_id();
        tree.leaf_arena[leaf_id].keys.swap(0, 1);

        let err = tree.validate().unwrap_err();
        assert!(err.is_structural(), "{}", err);
        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_broken_chain() {
        let mut tree = sample_tree();
        let leaf_id = tree.leftmost_leaf_id();
        tree.leaf_arena[leaf_id].next = NULL_NODE;

        match tree.validate() {
            Err(BPlusTreeError::CorruptedTree(msg)) => assert!(msg.contains("Leaf chain")),
            other => panic!("expected chain corruption, got {:?}", other),
        }
    }

    #[test]
    fn test_detects_chain_cycle() {
        let mut tree = sample_tree();
        let leaf_id = tree.leftmost_leaf_id();
        tree.leaf_arena[leaf_id].next = leaf_id;

        match tree.validate() {
            Err(BPlusTreeError::CorruptedTree(msg)) => assert!(msg.contains("cycle")),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_detects_fan_out_mismatch() {
        let mut tree = sample_tree();
        let root_id = tree.root().id();
        tree.internal_arena[root_id].children.pop();

        assert!(tree.validate().unwrap_err().is_structural());
    }

    #[test]
    fn test_detects_bad_separator() {
        let mut tree = sample_tree();
        let root_id = tree.root().id();
        tree.internal_arena[root_id].keys[0] = -5;

        assert!(!tree.check_invariants());
    }

    #[test]
    fn test_detects_orphaned_arena_node() {
        let mut tree = sample_tree();
        tree.leaf_arena.allocate(LeafNode::new(3));

        match tree.validate() {
            Err(BPlusTreeError::DataIntegrityError(msg)) => assert!(msg.contains("Leaf arena")),
            other => panic!("expected arena mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_structure_exact_dump() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new(3).unwrap();
        for key in 1..=4 {
            tree.insert_key(key);
        }
        assert_eq!(
            tree.debug_structure(),
            format!(
                "Internal[id=0]: [3]\n  Leaf[id=0, next=1]: [1, 2]\n  Leaf[id=1, next={}]: [3, 4]\n",
                NULL_NODE
            )
        );
    }

    #[test]
    fn test_debug_structure_lists_every_node() {
        let tree = sample_tree();
        let dump = tree.debug_structure();
        let (leaves, internals) = tree.count_nodes_in_tree();
        assert_eq!(dump.lines().count(), leaves + internals);
        assert!(dump.starts_with("Internal[id="));
    }
}
