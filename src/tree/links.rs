//! Linkage engine: structural primitives shared by every tree variant.
//!
//! [`RawTree`] owns the arena and the root id and exposes the operations
//! the balancing strategies are built from: search descent, single and
//! double rotations, transplant, and the three-case structural removal.
//! It carries no balancing policy of its own; strategies drive these
//! primitives through the hook contract in
//! [`BalanceStrategy`](super::BalanceStrategy).

use std::borrow::Borrow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::{Arena, Node, NodeId, Slot};

/// Outcome of a structural removal, handed to the strategy's
/// `after_remove` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached<M> {
    /// Parent of the position where the tree changed; repair starts here.
    pub parent: NodeId,
    /// Node now occupying the removed position, possibly [`NodeId::NIL`].
    pub replacement: NodeId,
    /// Metadata of the node that was spliced out of the tree. The red-black
    /// strategy reads the color here to decide whether a fix-up is needed.
    pub meta: M,
}

/// The node store plus the structural mutation primitives.
///
/// `M` is the strategy-private per-node metadata: `()` for plain and splay
/// trees, a height for AVL, a color for red-black, a priority for treaps.
#[derive(Debug)]
pub struct RawTree<K, V, M> {
    arena: Arena<K, V, M>,
    root: NodeId,
}

impl<K, V, M> Default for RawTree<K, V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, M> RawTree<K, V, M> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: NodeId::NIL,
        }
    }

    /// The current root, or [`NodeId::NIL`] for an empty tree.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Installs `node` as the root and clears its parent link.
    pub fn set_root(&mut self, node: NodeId) {
        self.root = node;
        if !node.is_nil() {
            self.arena.node_mut(node).parent = NodeId::NIL;
        }
    }

    /// Key of a node.
    #[inline]
    #[must_use]
    pub fn key(&self, node: NodeId) -> &K {
        &self.arena.node(node).key
    }

    /// Value of a node.
    #[inline]
    #[must_use]
    pub fn value(&self, node: NodeId) -> &V {
        &self.arena.node(node).value
    }

    /// Mutable value of a node.
    #[inline]
    pub fn value_mut(&mut self, node: NodeId) -> &mut V {
        &mut self.arena.node_mut(node).value
    }

    /// Strategy metadata of a node.
    #[inline]
    #[must_use]
    pub fn meta(&self, node: NodeId) -> &M {
        &self.arena.node(node).meta
    }

    /// Mutable strategy metadata of a node.
    #[inline]
    pub fn meta_mut(&mut self, node: NodeId) -> &mut M {
        &mut self.arena.node_mut(node).meta
    }

    /// Left child of a node.
    #[inline]
    #[must_use]
    pub fn left(&self, node: NodeId) -> NodeId {
        self.arena.node(node).left
    }

    /// Right child of a node.
    #[inline]
    #[must_use]
    pub fn right(&self, node: NodeId) -> NodeId {
        self.arena.node(node).right
    }

    /// Parent of a node, [`NodeId::NIL`] for the root.
    #[inline]
    #[must_use]
    pub fn parent(&self, node: NodeId) -> NodeId {
        self.arena.node(node).parent
    }

    pub(crate) fn entry(&self, node: NodeId) -> (&K, &V) {
        let stored = self.arena.node(node);
        (&stored.key, &stored.value)
    }

    /// Creates a detached leaf node and returns its id.
    pub fn alloc_node(&mut self, key: K, value: V, meta: M) -> NodeId {
        self.arena.alloc(Node::leaf(key, value, meta))
    }

    pub(crate) fn free_node(&mut self, node: NodeId) -> Node<K, V, M> {
        self.arena.free(node)
    }

    pub(crate) fn into_slots(self) -> Vec<Slot<K, V, M>> {
        self.arena.into_slots()
    }

    /// Makes `child` the left child of `parent`, fixing the back-link.
    /// A nil `child` clears the edge.
    pub fn attach_left(&mut self, parent: NodeId, child: NodeId) {
        self.arena.node_mut(parent).left = child;
        if !child.is_nil() {
            self.arena.node_mut(child).parent = parent;
        }
    }

    /// Makes `child` the right child of `parent`, fixing the back-link.
    /// A nil `child` clears the edge.
    pub fn attach_right(&mut self, parent: NodeId, child: NodeId) {
        self.arena.node_mut(parent).right = child;
        if !child.is_nil() {
            self.arena.node_mut(child).parent = parent;
        }
    }

    /// Drops every node. O(1) apart from destructors.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NodeId::NIL;
    }

    /// Iterative search descent. O(height).
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while !current.is_nil() {
            match key.cmp(self.key(current).borrow()) {
                Ordering::Less => current = self.left(current),
                Ordering::Greater => current = self.right(current),
                Ordering::Equal => break,
            }
        }
        current
    }

    /// Leftmost node of the subtree rooted at `node`.
    #[must_use]
    pub fn min_in_subtree(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while !current.is_nil() && !self.left(current).is_nil() {
            current = self.left(current);
        }
        current
    }

    /// Rightmost node of the subtree rooted at `node`.
    #[must_use]
    pub fn max_in_subtree(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while !current.is_nil() && !self.right(current).is_nil() {
            current = self.right(current);
        }
        current
    }

    /// Height of the subtree rooted at `node`; 0 for nil.
    ///
    /// Computed with an explicit stack, O(subtree size).
    #[must_use]
    pub fn subtree_height(&self, node: NodeId) -> usize {
        if node.is_nil() {
            return 0;
        }
        let mut highest = 0;
        let mut stack: SmallVec<[(NodeId, usize); 16]> = SmallVec::new();
        stack.push((node, 1));
        while let Some((current, depth)) = stack.pop() {
            highest = highest.max(depth);
            let left = self.left(current);
            if !left.is_nil() {
                stack.push((left, depth + 1));
            }
            let right = self.right(current);
            if !right.is_nil() {
                stack.push((right, depth + 1));
            }
        }
        highest
    }

    /// Classic left rotation around `node`. No-op when the right child is
    /// absent. Preserves BST order; updates the three affected parent
    /// links and reconnects the new subtree root into the old slot.
    pub fn rotate_left(&mut self, node: NodeId) {
        let pivot = self.right(node);
        if pivot.is_nil() {
            return;
        }
        let inner = self.left(pivot);
        self.arena.node_mut(node).right = inner;
        if !inner.is_nil() {
            self.arena.node_mut(inner).parent = node;
        }
        self.replace_in_parent_slot(node, pivot);
        self.arena.node_mut(pivot).left = node;
        self.arena.node_mut(node).parent = pivot;
    }

    /// Classic right rotation around `node`. No-op when the left child is
    /// absent.
    pub fn rotate_right(&mut self, node: NodeId) {
        let pivot = self.left(node);
        if pivot.is_nil() {
            return;
        }
        let inner = self.right(pivot);
        self.arena.node_mut(node).left = inner;
        if !inner.is_nil() {
            self.arena.node_mut(inner).parent = node;
        }
        self.replace_in_parent_slot(node, pivot);
        self.arena.node_mut(pivot).right = node;
        self.arena.node_mut(node).parent = pivot;
    }

    /// Double rotation for the right-left shape: rotate the right child
    /// right, then rotate `node` left.
    pub fn rotate_big_left(&mut self, node: NodeId) {
        let right = self.right(node);
        if !right.is_nil() {
            self.rotate_right(right);
        }
        self.rotate_left(node);
    }

    /// Double rotation for the left-right shape: rotate the left child
    /// left, then rotate `node` right.
    pub fn rotate_big_right(&mut self, node: NodeId) {
        let left = self.left(node);
        if !left.is_nil() {
            self.rotate_left(left);
        }
        self.rotate_right(node);
    }

    /// Replaces the subtree rooted at `u` with the subtree rooted at `v`
    /// in `u`'s parent slot (or at the tree root). `v` may be nil. `u`'s
    /// own links are left untouched.
    pub fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.parent(u);
        if parent.is_nil() {
            self.root = v;
        } else if self.left(parent) == u {
            self.arena.node_mut(parent).left = v;
        } else {
            self.arena.node_mut(parent).right = v;
        }
        if !v.is_nil() {
            self.arena.node_mut(v).parent = parent;
        }
    }

    fn replace_in_parent_slot(&mut self, node: NodeId, pivot: NodeId) {
        let parent = self.parent(node);
        self.arena.node_mut(pivot).parent = parent;
        if parent.is_nil() {
            self.root = pivot;
        } else if self.left(parent) == node {
            self.arena.node_mut(parent).left = pivot;
        } else {
            self.arena.node_mut(parent).right = pivot;
        }
    }
}

impl<K, V, M: Copy> RawTree<K, V, M> {
    /// Three-case structural removal.
    ///
    /// Zero children: transplant with nil. One child: transplant with the
    /// sole child. Two children: the in-order successor (leftmost node of
    /// the right subtree) is relinked into `node`'s position: the
    /// successor node itself moves, keeping its slot id, and inherits the
    /// removed position's metadata.
    ///
    /// Returns the removed value together with the [`Detached`] record the
    /// strategy hook needs to decide where repair starts.
    pub fn remove_structural(&mut self, node: NodeId) -> (V, Detached<M>) {
        let node_meta = *self.meta(node);
        let left = self.left(node);
        let right = self.right(node);

        let detached = if left.is_nil() {
            let parent = self.parent(node);
            self.transplant(node, right);
            Detached {
                parent,
                replacement: right,
                meta: node_meta,
            }
        } else if right.is_nil() {
            let parent = self.parent(node);
            self.transplant(node, left);
            Detached {
                parent,
                replacement: left,
                meta: node_meta,
            }
        } else {
            let successor = self.min_in_subtree(right);
            let spliced_meta = *self.meta(successor);
            let successor_right = self.right(successor);
            let fixup_parent = if self.parent(successor) == node {
                successor
            } else {
                let deep_parent = self.parent(successor);
                self.transplant(successor, successor_right);
                // The successor adopts the removed node's right subtree.
                self.attach_right(successor, self.right(node));
                deep_parent
            };
            self.transplant(node, successor);
            self.attach_left(successor, left);
            self.arena.node_mut(successor).meta = node_meta;
            Detached {
                parent: fixup_parent,
                replacement: successor_right,
                meta: spliced_meta,
            }
        };

        let freed = self.arena.free(node);
        (freed.value, detached)
    }
}
