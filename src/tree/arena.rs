//! Slot arena backing the tree nodes.
//!
//! Nodes live in a `Vec` of slots and point at each other by index, so the
//! parent back-reference is a plain non-owning [`NodeId`] rather than a
//! shared pointer. Removed slots go onto an intrusive free list and are
//! reused by later insertions.

use std::fmt;

/// Index of a node inside the arena.
///
/// The sentinel [`NodeId::NIL`] stands for "no node" (an absent child, the
/// parent of the root, an empty tree's root).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The null sentinel.
    pub const NIL: Self = Self(u32::MAX);

    /// Returns `true` if this id is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "arena exhausted");
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(formatter, "NodeId(nil)")
        } else {
            write!(formatter, "NodeId({})", self.0)
        }
    }
}

/// A tree node: key, value, strategy-private metadata and three links.
///
/// `left` and `right` are the owning edges; `parent` is a back-index used
/// only for navigation. The key never changes while the node is in the
/// tree; the value may be overwritten in place.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V, M> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) meta: M,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
}

impl<K, V, M> Node<K, V, M> {
    pub(crate) const fn leaf(key: K, value: V, meta: M) -> Self {
        Self {
            key,
            value,
            meta,
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent: NodeId::NIL,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V, M> {
    Occupied(Node<K, V, M>),
    Vacant { next_free: NodeId },
}

/// Node storage with free-list reuse.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V, M> {
    slots: Vec<Slot<K, V, M>>,
    free_head: NodeId,
}

impl<K, V, M> Arena<K, V, M> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: NodeId::NIL,
        }
    }

    /// Stores a node, reusing a vacant slot when one is available.
    pub(crate) fn alloc(&mut self, node: Node<K, V, M>) -> NodeId {
        if self.free_head.is_nil() {
            let id = NodeId::from_index(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            id
        } else {
            let id = self.free_head;
            let slot = std::mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
            match slot {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            }
            id
        }
    }

    /// Releases a slot and returns the node it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K, V, M> {
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = id;
        match slot {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("freed a vacant arena slot: {id:?}"),
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V, M> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("accessed a vacant arena slot: {id:?}"),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V, M> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("accessed a vacant arena slot: {id:?}"),
        }
    }

    /// Drops every slot at once. O(1) apart from running destructors.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NodeId::NIL;
    }

    /// Consumes the arena, exposing the raw slots for the owned iterator.
    pub(crate) fn into_slots(self) -> Vec<Slot<K, V, M>> {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_reuses_freed_slot() {
        let mut arena: Arena<i32, &str, ()> = Arena::new();
        let first = arena.alloc(Node::leaf(1, "one", ()));
        let second = arena.alloc(Node::leaf(2, "two", ()));

        let freed = arena.free(first);
        assert_eq!(freed.key, 1);

        let third = arena.alloc(Node::leaf(3, "three", ()));
        assert_eq!(third, first, "vacant slot should be reused");
        assert_eq!(arena.node(second).key, 2);
        assert_eq!(arena.node(third).key, 3);
    }

    #[test]
    fn test_nil_sentinel() {
        assert!(NodeId::NIL.is_nil());
        assert!(!NodeId::from_index(0).is_nil());
        assert_eq!(format!("{:?}", NodeId::NIL), "NodeId(nil)");
    }

    #[test]
    #[should_panic(expected = "vacant arena slot")]
    fn test_double_free_panics() {
        let mut arena: Arena<i32, i32, ()> = Arena::new();
        let id = arena.alloc(Node::leaf(1, 1, ()));
        arena.free(id);
        arena.free(id);
    }
}
