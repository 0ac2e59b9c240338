//! Tree structure management operations for BPlusTree.
//!
//! Size and shape queries, node counting, and clearing.

use crate::types::{BPlusTree, LeafNode, NodeRef};

impl<K, V> BPlusTree<K, V> {
    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, node: NodeRef<K, V>) -> usize {
        match node {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].keys.len(),
            NodeRef::Internal(id, _) => self.internal_arena[id]
                .children
                .iter()
                .map(|&child| self.len_recursive(child))
                .sum(),
        }
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        match self.root {
            NodeRef::Leaf(id, _) => self.leaf_arena[id].keys.is_empty(),
            // internal roots with no entries are collapsed on delete
            NodeRef::Internal(_, _) => false,
        }
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels, counting the root; a lone leaf root has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Internal(id, _) = current {
            current = self.internal_arena[id].children[0];
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the `(leaf, internal)` nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef<K, V>) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_, _) => (1, 0),
            NodeRef::Internal(id, _) => self.internal_arena[id].children.iter().fold(
                (0, 1),
                |(leaves, internals), &child| {
                    let (child_leaves, child_internals) = self.count_nodes_recursive(child);
                    (leaves + child_leaves, internals + child_internals)
                },
            ),
        }
    }

    /// Clear all items from the tree, keeping its order.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.internal_arena.clear();

        let root_id = self.leaf_arena.allocate(LeafNode::new(self.order));
        self.root = NodeRef::leaf(root_id);
    }
}

#[cfg(test)]
mod tests {
    use crate::types::BPlusTree;

    #[test]
    fn test_len_and_shape() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new(3).unwrap();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.count_nodes_in_tree(), (1, 0));

        for key in 0..30 {
            tree.insert_key(key);
        }
        assert_eq!(tree.len(), 30);
        assert!(!tree.is_empty());
        assert!(tree.height() > 2);

        let (leaves, internals) = tree.count_nodes_in_tree();
        assert_eq!(leaves, tree.leaf_count());
        assert_eq!(leaves, tree.leaf_arena.len());
        assert_eq!(internals, tree.internal_arena.len());
    }

    #[test]
    fn test_clear_resets_to_single_leaf() {
        let mut tree: BPlusTree<i32, i32> = BPlusTree::new(4).unwrap();
        for key in 0..100 {
            tree.insert_key(key);
        }
        tree.clear();

        assert!(tree.is_empty());
        assert!(tree.is_leaf_root());
        assert_eq!(tree.order(), 4);
        assert_eq!(tree.count_nodes_in_tree(), (1, 0));

        tree.insert_key(5);
        assert_eq!(tree.search(&5), Some(&5));
    }
}
