//! Compact arena storage for tree nodes.
//!
//! Nodes are stored inline in a `Vec<T>` with a separate allocation mask and a
//! free list, so a freed slot is recycled by the next allocation. Ids are plain
//! `u32` indices; the tree never holds a reference into the arena across a
//! mutation, only ids.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

use crate::types::{NodeId, NULL_NODE};

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactArenaStats {
    pub allocated_count: usize,
    pub free_count: usize,
}

/// Arena allocator with slot reuse.
#[derive(Debug)]
pub struct CompactArena<T> {
    storage: Vec<T>,
    free_list: Vec<usize>,
    allocated_mask: Vec<bool>,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };

        match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("arena exhausted: slot {} does not fit in a NodeId", index),
        }
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T>
    where
        T: Default,
    {
        let index = self.slot(id)?;

        self.allocated_mask[index] = false;
        self.free_list.push(index);

        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slot(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slot(id) {
            Some(index) => Some(&mut self.storage[index]),
            None => None,
        }
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    fn slot(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        CompactArenaStats {
            allocated_count: self.len(),
            free_count: self.free_list.len(),
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated_mask
            .iter()
            .filter(|&&allocated| allocated)
            .count()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.allocated_mask.clear();
        self.free_list.clear();
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// A dangling id during a mutation is a logic fault, not a recoverable outcome.
impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("dangling node id {}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.slot(id) {
            Some(index) => &mut self.storage[index],
            None => panic!("dangling node id {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_arena_basic_operations() {
        let mut arena = CompactArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);
        let id3 = arena.allocate(126);

        assert_eq!(arena.get(id1), Some(&42));
        assert_eq!(arena[id2], 84);
        assert_eq!(arena.get(id3), Some(&126));

        assert!(arena.contains(id1));
        assert!(!arena.contains(NULL_NODE));

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 3);
        assert_eq!(stats.free_count, 0);
    }

    #[test]
    fn test_deallocated_slot_is_reused() {
        let mut arena: CompactArena<i32> = CompactArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);

        assert_eq!(arena.deallocate(id1), Some(42));
        assert!(!arena.contains(id1));
        assert!(arena.contains(id2));
        assert_eq!(arena.deallocate(id1), None);

        let id3 = arena.allocate(168);
        assert_eq!(id3, id1);
        assert_eq!(arena.get(id3), Some(&168));
        assert_eq!(arena.stats().free_count, 0);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_index_mut_updates_in_place() {
        let mut arena = CompactArena::new();
        let id = arena.allocate(String::from("a"));
        arena[id].push('b');
        assert_eq!(arena[id], "ab");
    }

    #[test]
    #[should_panic(expected = "dangling node id")]
    fn test_index_on_freed_slot_panics() {
        let mut arena: CompactArena<i32> = CompactArena::new();
        let id = arena.allocate(1);
        arena.deallocate(id);
        let _ = arena[id];
    }

    #[test]
    fn test_clear() {
        let mut arena = CompactArena::new();
        arena.allocate(1);
        arena.allocate(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.free_count(), 0);
    }
}
