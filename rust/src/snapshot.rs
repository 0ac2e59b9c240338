//! Read-only export of the tree shape.
//!
//! A `NodeSnapshot` is an owned copy of the node hierarchy: kind, keys and
//! children for every node, plus an optional highlight flag for nodes whose
//! key list contains a probe key. It carries no arena ids, so it stays valid
//! after the tree is mutated and can be handed to any renderer.

use std::fmt;

use crate::types::{BPlusTree, NodeRef};

/// Whether a snapshot node was a leaf or an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Internal,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Internal => write!(f, "internal"),
        }
    }
}

/// Owned copy of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot<K> {
    pub kind: NodeKind,
    pub keys: Vec<K>,
    /// Set by `snapshot_highlighting` when `keys` contains the probe key.
    pub highlighted: bool,
    /// Empty for leaves.
    pub children: Vec<NodeSnapshot<K>>,
}

impl<K> NodeSnapshot<K> {
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeSnapshot::node_count)
            .sum::<usize>()
    }

    /// Leaf key lists from left to right.
    pub fn leaf_keys(&self) -> Vec<&[K]> {
        let mut out = Vec::new();
        self.collect_leaf_keys(&mut out);
        out
    }

    fn collect_leaf_keys<'a>(&'a self, out: &mut Vec<&'a [K]>) {
        if self.is_leaf() {
            out.push(&self.keys);
        } else {
            for child in &self.children {
                child.collect_leaf_keys(out);
            }
        }
    }
}

impl<K: fmt::Display> NodeSnapshot<K> {
    /// Keys joined with commas, e.g. `"5,6,7"`.
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<K: fmt::Display> fmt::Display for NodeSnapshot<K> {
    /// Indented outline, one node per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node<K: fmt::Display>(
            node: &NodeSnapshot<K>,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let marker = if node.highlighted { " *" } else { "" };
            writeln!(f, "{}{} [{}]{}", "  ".repeat(depth), node.kind, node.label(), marker)?;
            for child in &node.children {
                write_node(child, depth + 1, f)?;
            }
            Ok(())
        }
        write_node(self, 0, f)
    }
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Export the whole tree as an owned snapshot.
    ///
    /// ```
    /// use bplus_engine::{BPlusTree, NodeKind};
    ///
    /// let mut tree: BPlusTree<i32, i32> = BPlusTree::new(3).unwrap();
    /// for key in [10, 20, 5, 6] {
    ///     tree.insert_key(key);
    /// }
    /// let root = tree.snapshot();
    /// assert_eq!(root.kind, NodeKind::Internal);
    /// assert_eq!(root.keys, vec![10]);
    /// assert_eq!(root.leaf_keys(), vec![&[5, 6][..], &[10, 20][..]]);
    /// ```
    pub fn snapshot(&self) -> NodeSnapshot<K> {
        self.snapshot_node(self.root, None)
    }

    /// Export the tree, flagging every node whose keys contain `key`.
    pub fn snapshot_highlighting(&self, key: &K) -> NodeSnapshot<K> {
        self.snapshot_node(self.root, Some(key))
    }

    fn snapshot_node(&self, node: NodeRef<K, V>, probe: Option<&K>) -> NodeSnapshot<K> {
        let (kind, keys, children) = match node {
            NodeRef::Leaf(id, _) => (NodeKind::Leaf, &self.leaf_arena[id].keys, Vec::new()),
            NodeRef::Internal(id, _) => {
                let internal = &self.internal_arena[id];
                let children = internal
                    .children
                    .iter()
                    .map(|&child| self.snapshot_node(child, probe))
                    .collect();
                (NodeKind::Internal, &internal.keys, children)
            }
        };

        NodeSnapshot {
            kind,
            keys: keys.clone(),
            highlighted: probe.is_some_and(|probe| keys.binary_search(probe).is_ok()),
            children,
        }
    }
}
