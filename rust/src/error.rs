//! Error handling and result types for BPlusTree operations.
//!
//! Every condition here is an expected, recoverable outcome. Structural faults
//! found while the tree is being mutated are logic bugs and panic instead; the
//! `CorruptedTree` and `DataIntegrityError` variants are only produced by the
//! validator when it inspects a tree from the outside.

use thiserror::Error;

/// Error type for B+ tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BPlusTreeError {
    /// Key not found in the tree.
    #[error("Key not found in tree")]
    KeyNotFound,

    /// The requested order is below the supported minimum.
    #[error("Invalid order: {order} (minimum required: {min})")]
    InvalidOrder {
        /// Order passed to the constructor.
        order: usize,
        /// Smallest order the tree accepts.
        min: usize,
    },

    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Tree corruption detected.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
}

impl BPlusTreeError {
    /// Create an InvalidOrder error with context
    pub fn invalid_order(order: usize, min: usize) -> Self {
        Self::InvalidOrder { order, min }
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is an order (configuration) error
    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder { .. })
    }

    /// Check if this error reports a structural problem found by validation
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DataIntegrityError(_) | Self::CorruptedTree(_))
    }
}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, BPlusTreeError>;

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BPlusTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_message() {
        let err = BPlusTreeError::invalid_order(1, 2);
        assert_eq!(err.to_string(), "Invalid order: 1 (minimum required: 2)");
        assert!(err.is_order_error());
        assert!(!err.is_structural());
    }

    #[test]
    fn test_context_helpers() {
        let err = BPlusTreeError::corrupted_tree("Leaf chain", "cycle at node 3");
        assert_eq!(
            err.to_string(),
            "Corrupted tree: Leaf chain corruption: cycle at node 3"
        );
        assert!(err.is_structural());

        let err = BPlusTreeError::data_integrity("delete", "fan-out mismatch");
        assert_eq!(err.to_string(), "Data integrity error: delete: fan-out mismatch");
    }

    #[test]
    fn test_key_not_found_display() {
        assert_eq!(BPlusTreeError::KeyNotFound.to_string(), "Key not found in tree");
    }
}
