//! Balancing strategies: the pluggable state machines behind each variant.
//!
//! Every strategy implements [`BalanceStrategy`]: a node-construction hook
//! (`create_meta`), an after-insert hook, an after-structural-removal hook
//! and an after-access hook. The facade calls the hooks immediately after
//! the linkage engine completes a structural change; strategies repair the
//! shape using the engine's rotation and transplant primitives.
//!
//! The default `insert`/`remove` methods implement the standard BST
//! descent plus hook dispatch; [`TreapBalance`] overrides them entirely
//! because treaps mutate through split/merge instead of rotations.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::arena::NodeId;
use super::links::{Detached, RawTree};

/// Hook contract between the tree facade and a balancing policy.
///
/// `Meta` is the strategy-private field stored in every node. The hooks
/// receive the raw tree and may freely call its structural primitives;
/// they are expected to always succeed on a structurally valid tree. A
/// violated balance invariant mid-operation is a programming defect,
/// not a recoverable error.
pub trait BalanceStrategy<K: Ord, V>: Default {
    /// Per-node bookkeeping attached by this strategy.
    type Meta: Copy + fmt::Debug;

    /// Produces the bookkeeping for a node about to be created.
    fn create_meta(&mut self) -> Self::Meta;

    /// Called right after a new node has been linked into the tree.
    fn after_insert(&mut self, raw: &mut RawTree<K, V, Self::Meta>, node: NodeId) {
        let _ = (raw, node);
    }

    /// Called right after a structural removal completed.
    fn after_remove(&mut self, raw: &mut RawTree<K, V, Self::Meta>, detached: Detached<Self::Meta>) {
        let _ = (raw, detached);
    }

    /// Called after a successful lookup or an overwrite of an existing
    /// key. Only the splay strategy reacts to this.
    fn after_access(&mut self, raw: &mut RawTree<K, V, Self::Meta>, node: NodeId) {
        let _ = (raw, node);
    }

    /// Inserts or overwrites; returns the previous value on overwrite.
    ///
    /// The default is the standard BST descent: overwrite mutates the
    /// value in place without any shape change, a new key is attached as
    /// a leaf and reported through [`after_insert`](Self::after_insert).
    fn insert(&mut self, raw: &mut RawTree<K, V, Self::Meta>, key: K, value: V) -> Option<V> {
        let mut current = raw.root();
        let mut parent = NodeId::NIL;
        let mut go_left = false;
        while !current.is_nil() {
            match key.cmp(raw.key(current)) {
                Ordering::Less => {
                    parent = current;
                    go_left = true;
                    current = raw.left(current);
                }
                Ordering::Greater => {
                    parent = current;
                    go_left = false;
                    current = raw.right(current);
                }
                Ordering::Equal => {
                    let previous = std::mem::replace(raw.value_mut(current), value);
                    self.after_access(raw, current);
                    return Some(previous);
                }
            }
        }

        let meta = self.create_meta();
        let node = raw.alloc_node(key, value, meta);
        if parent.is_nil() {
            raw.set_root(node);
        } else if go_left {
            raw.attach_left(parent, node);
        } else {
            raw.attach_right(parent, node);
        }
        self.after_insert(raw, node);
        None
    }

    /// Removes a key; returns its value if it was present.
    ///
    /// The default finds the node, performs the three-case structural
    /// removal and reports the outcome through
    /// [`after_remove`](Self::after_remove).
    fn remove<Q>(&mut self, raw: &mut RawTree<K, V, Self::Meta>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = raw.find(key);
        if node.is_nil() {
            return None;
        }
        let (value, detached) = raw.remove_structural(node);
        self.after_remove(raw, detached);
        Some(value)
    }
}

// =============================================================================
// Plain BST
// =============================================================================

/// No rebalancing at all.
///
/// No shape guarantee beyond BST order; adversarial insertion order
/// degrades every operation to O(n).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbalanced;

impl<K: Ord, V> BalanceStrategy<K, V> for Unbalanced {
    type Meta = ();

    fn create_meta(&mut self) -> Self::Meta {}
}

// =============================================================================
// AVL
// =============================================================================

/// AVL height rebalancing.
///
/// Every node caches the height of its subtree (a leaf has height 1).
/// After an insertion one rebalancing point suffices; after a removal
/// every unbalanced ancestor on the path to the root is repaired.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvlBalance;

impl AvlBalance {
    fn height<K, V>(raw: &RawTree<K, V, u32>, node: NodeId) -> u32 {
        if node.is_nil() { 0 } else { *raw.meta(node) }
    }

    fn update_height<K, V>(raw: &mut RawTree<K, V, u32>, node: NodeId) {
        let left = Self::height(raw, raw.left(node));
        let right = Self::height(raw, raw.right(node));
        *raw.meta_mut(node) = 1 + left.max(right);
    }

    fn balance_factor<K, V>(raw: &RawTree<K, V, u32>, node: NodeId) -> i64 {
        i64::from(Self::height(raw, raw.left(node))) - i64::from(Self::height(raw, raw.right(node)))
    }

    /// Applies the rotation case matching the unbalanced shape at `node`
    /// and refreshes the cached heights of the rotated nodes.
    fn rebalance<K, V>(raw: &mut RawTree<K, V, u32>, node: NodeId) {
        if Self::balance_factor(raw, node) > 1 {
            let child = raw.left(node);
            if Self::balance_factor(raw, child) < 0 {
                // Left-right shape.
                let grandchild = raw.right(child);
                raw.rotate_big_right(node);
                Self::update_height(raw, child);
                Self::update_height(raw, node);
                Self::update_height(raw, grandchild);
            } else {
                raw.rotate_right(node);
                Self::update_height(raw, node);
                Self::update_height(raw, child);
            }
        } else {
            let child = raw.right(node);
            if Self::balance_factor(raw, child) > 0 {
                // Right-left shape.
                let grandchild = raw.left(child);
                raw.rotate_big_left(node);
                Self::update_height(raw, child);
                Self::update_height(raw, node);
                Self::update_height(raw, grandchild);
            } else {
                raw.rotate_left(node);
                Self::update_height(raw, node);
                Self::update_height(raw, child);
            }
        }
    }
}

impl<K: Ord, V> BalanceStrategy<K, V> for AvlBalance {
    type Meta = u32;

    fn create_meta(&mut self) -> Self::Meta {
        1
    }

    fn after_insert(&mut self, raw: &mut RawTree<K, V, u32>, node: NodeId) {
        let mut current = raw.parent(node);
        while !current.is_nil() {
            Self::update_height(raw, current);
            if Self::balance_factor(raw, current).abs() > 1 {
                // A single rotation point restores balance after an
                // insertion; heights above it are unchanged.
                Self::rebalance(raw, current);
                break;
            }
            current = raw.parent(current);
        }
    }

    fn after_remove(&mut self, raw: &mut RawTree<K, V, u32>, detached: Detached<u32>) {
        // Unlike insertion, a removal may leave unbalanced ancestors all
        // along the path, so the walk continues to the root.
        let mut current = detached.parent;
        while !current.is_nil() {
            Self::update_height(raw, current);
            if Self::balance_factor(raw, current).abs() > 1 {
                Self::rebalance(raw, current);
                // The rotation put a new subtree root above `current`;
                // the loop re-checks it on the way up.
            }
            current = raw.parent(current);
        }
    }
}

// =============================================================================
// Red-Black
// =============================================================================

/// Color of a red-black tree node. Nil children count as black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red nodes may not have red children.
    Red,
    /// Every root-to-nil path crosses the same number of black nodes.
    Black,
}

/// Red-black color rebalancing.
///
/// New nodes start red; the insert fix-up recolors or rotates upward
/// until the red-red violation disappears, and the root is forced black.
/// The removal fix-up resolves the double-black deficit left by splicing
/// out a black node.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedBlackBalance;

impl RedBlackBalance {
    fn color<K, V>(raw: &RawTree<K, V, Color>, node: NodeId) -> Color {
        if node.is_nil() {
            Color::Black
        } else {
            *raw.meta(node)
        }
    }

    fn fix_double_black<K, V>(raw: &mut RawTree<K, V, Color>, mut node: NodeId, mut parent: NodeId) {
        while node != raw.root() && Self::color(raw, node) == Color::Black {
            if parent.is_nil() {
                break;
            }
            if node == raw.left(parent) {
                let mut sibling = raw.right(parent);
                debug_assert!(!sibling.is_nil(), "double-black node without a sibling");
                if sibling.is_nil() {
                    break;
                }
                if Self::color(raw, sibling) == Color::Red {
                    *raw.meta_mut(sibling) = Color::Black;
                    *raw.meta_mut(parent) = Color::Red;
                    raw.rotate_left(parent);
                    sibling = raw.right(parent);
                }
                if Self::color(raw, raw.left(sibling)) == Color::Black
                    && Self::color(raw, raw.right(sibling)) == Color::Black
                {
                    // Both nephews black: push the deficit to the parent.
                    *raw.meta_mut(sibling) = Color::Red;
                    node = parent;
                    parent = raw.parent(node);
                } else {
                    if Self::color(raw, raw.right(sibling)) == Color::Black {
                        let near = raw.left(sibling);
                        *raw.meta_mut(near) = Color::Black;
                        *raw.meta_mut(sibling) = Color::Red;
                        raw.rotate_right(sibling);
                        sibling = raw.right(parent);
                    }
                    *raw.meta_mut(sibling) = Self::color(raw, parent);
                    *raw.meta_mut(parent) = Color::Black;
                    let far = raw.right(sibling);
                    *raw.meta_mut(far) = Color::Black;
                    raw.rotate_left(parent);
                    node = raw.root();
                    parent = NodeId::NIL;
                }
            } else {
                let mut sibling = raw.left(parent);
                debug_assert!(!sibling.is_nil(), "double-black node without a sibling");
                if sibling.is_nil() {
                    break;
                }
                if Self::color(raw, sibling) == Color::Red {
                    *raw.meta_mut(sibling) = Color::Black;
                    *raw.meta_mut(parent) = Color::Red;
                    raw.rotate_right(parent);
                    sibling = raw.left(parent);
                }
                if Self::color(raw, raw.left(sibling)) == Color::Black
                    && Self::color(raw, raw.right(sibling)) == Color::Black
                {
                    *raw.meta_mut(sibling) = Color::Red;
                    node = parent;
                    parent = raw.parent(node);
                } else {
                    if Self::color(raw, raw.left(sibling)) == Color::Black {
                        let near = raw.right(sibling);
                        *raw.meta_mut(near) = Color::Black;
                        *raw.meta_mut(sibling) = Color::Red;
                        raw.rotate_left(sibling);
                        sibling = raw.left(parent);
                    }
                    *raw.meta_mut(sibling) = Self::color(raw, parent);
                    *raw.meta_mut(parent) = Color::Black;
                    let far = raw.left(sibling);
                    *raw.meta_mut(far) = Color::Black;
                    raw.rotate_right(parent);
                    node = raw.root();
                    parent = NodeId::NIL;
                }
            }
        }
        if !node.is_nil() {
            *raw.meta_mut(node) = Color::Black;
        }
    }
}

impl<K: Ord, V> BalanceStrategy<K, V> for RedBlackBalance {
    type Meta = Color;

    fn create_meta(&mut self) -> Self::Meta {
        Color::Red
    }

    fn after_insert(&mut self, raw: &mut RawTree<K, V, Color>, node: NodeId) {
        let mut current = node;
        loop {
            let parent = raw.parent(current);
            if parent.is_nil() || Self::color(raw, parent) == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let grand = raw.parent(parent);
            if parent == raw.left(grand) {
                let uncle = raw.right(grand);
                if Self::color(raw, uncle) == Color::Red {
                    *raw.meta_mut(parent) = Color::Black;
                    *raw.meta_mut(uncle) = Color::Black;
                    *raw.meta_mut(grand) = Color::Red;
                    current = grand;
                } else {
                    if current == raw.right(parent) {
                        // Triangle: rotate into a line first.
                        current = parent;
                        raw.rotate_left(current);
                    }
                    let line_parent = raw.parent(current);
                    let line_grand = raw.parent(line_parent);
                    *raw.meta_mut(line_parent) = Color::Black;
                    *raw.meta_mut(line_grand) = Color::Red;
                    raw.rotate_right(line_grand);
                }
            } else {
                let uncle = raw.left(grand);
                if Self::color(raw, uncle) == Color::Red {
                    *raw.meta_mut(parent) = Color::Black;
                    *raw.meta_mut(uncle) = Color::Black;
                    *raw.meta_mut(grand) = Color::Red;
                    current = grand;
                } else {
                    if current == raw.left(parent) {
                        current = parent;
                        raw.rotate_right(current);
                    }
                    let line_parent = raw.parent(current);
                    let line_grand = raw.parent(line_parent);
                    *raw.meta_mut(line_parent) = Color::Black;
                    *raw.meta_mut(line_grand) = Color::Red;
                    raw.rotate_left(line_grand);
                }
            }
        }
        let root = raw.root();
        *raw.meta_mut(root) = Color::Black;
    }

    fn after_remove(&mut self, raw: &mut RawTree<K, V, Color>, detached: Detached<Color>) {
        // Splicing out a red node disturbs nothing; a black one leaves a
        // double-black deficit at the replacement position.
        if detached.meta == Color::Black {
            Self::fix_double_black(raw, detached.replacement, detached.parent);
        }
    }
}

// =============================================================================
// Splay
// =============================================================================

/// Move-to-root restructuring.
///
/// No per-node bookkeeping; the amortized O(log n) bound emerges from
/// splaying the accessed node to the root on every insert, successful
/// lookup and overwrite, and the removed node's parent on every removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplayBalance;

impl SplayBalance {
    fn splay<K, V>(raw: &mut RawTree<K, V, ()>, node: NodeId) {
        loop {
            let parent = raw.parent(node);
            if parent.is_nil() {
                break;
            }
            let grand = raw.parent(parent);
            if grand.is_nil() {
                // Zig.
                if node == raw.left(parent) {
                    raw.rotate_right(parent);
                } else {
                    raw.rotate_left(parent);
                }
            } else {
                let node_is_left = node == raw.left(parent);
                let parent_is_left = parent == raw.left(grand);
                match (node_is_left, parent_is_left) {
                    // Zig-zig: rotate the grandparent first.
                    (true, true) => {
                        raw.rotate_right(grand);
                        raw.rotate_right(parent);
                    }
                    (false, false) => {
                        raw.rotate_left(grand);
                        raw.rotate_left(parent);
                    }
                    // Zig-zag: two opposite rotations.
                    (true, false) => {
                        raw.rotate_right(parent);
                        raw.rotate_left(grand);
                    }
                    (false, true) => {
                        raw.rotate_left(parent);
                        raw.rotate_right(grand);
                    }
                }
            }
        }
    }
}

impl<K: Ord, V> BalanceStrategy<K, V> for SplayBalance {
    type Meta = ();

    fn create_meta(&mut self) -> Self::Meta {}

    fn after_insert(&mut self, raw: &mut RawTree<K, V, ()>, node: NodeId) {
        Self::splay(raw, node);
    }

    fn after_remove(&mut self, raw: &mut RawTree<K, V, ()>, detached: Detached<()>) {
        if !detached.parent.is_nil() {
            Self::splay(raw, detached.parent);
        }
    }

    fn after_access(&mut self, raw: &mut RawTree<K, V, ()>, node: NodeId) {
        Self::splay(raw, node);
    }
}

// =============================================================================
// Treap
// =============================================================================

/// Randomized heap priorities with split/merge mutation.
///
/// Every node draws a priority once at creation and keeps it for life;
/// the tree is simultaneously a BST on keys and a max-heap on priorities.
/// Inserts and removals go through split/merge instead of rotations, so
/// the after-hooks stay empty.
///
/// The default instance seeds its generator from the OS; tests that need
/// a reproducible shape use [`TreapBalance::with_seed`].
#[derive(Debug, Clone)]
pub struct TreapBalance {
    rng: StdRng,
}

impl Default for TreapBalance {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl TreapBalance {
    /// A strategy drawing priorities from a fixed-seed generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Partitions the subtree at `tree` into (keys ≤ pivot's key,
    /// keys > pivot's key) by recursive descent, re-attaching the
    /// non-traversed side at each level.
    fn split<K: Ord, V>(
        raw: &mut RawTree<K, V, u64>,
        tree: NodeId,
        pivot: NodeId,
    ) -> (NodeId, NodeId) {
        if tree.is_nil() {
            return (NodeId::NIL, NodeId::NIL);
        }
        if raw.key(tree) <= raw.key(pivot) {
            let right = raw.right(tree);
            let (low, high) = Self::split(raw, right, pivot);
            raw.attach_right(tree, low);
            (tree, high)
        } else {
            let left = raw.left(tree);
            let (low, high) = Self::split(raw, left, pivot);
            raw.attach_left(tree, high);
            (low, tree)
        }
    }

    /// Joins two trees where every key in `low` is smaller than every key
    /// in `high`, keeping the higher priority on top.
    fn merge<K: Ord, V>(raw: &mut RawTree<K, V, u64>, low: NodeId, high: NodeId) -> NodeId {
        if low.is_nil() {
            return high;
        }
        if high.is_nil() {
            return low;
        }
        if raw.meta(low) >= raw.meta(high) {
            let right = raw.right(low);
            let merged = Self::merge(raw, right, high);
            raw.attach_right(low, merged);
            low
        } else {
            let left = raw.left(high);
            let merged = Self::merge(raw, low, left);
            raw.attach_left(high, merged);
            high
        }
    }
}

impl<K: Ord, V> BalanceStrategy<K, V> for TreapBalance {
    type Meta = u64;

    fn create_meta(&mut self) -> Self::Meta {
        self.rng.next_u64()
    }

    fn insert(&mut self, raw: &mut RawTree<K, V, u64>, key: K, value: V) -> Option<V> {
        let existing = raw.find(&key);
        if !existing.is_nil() {
            // Overwrite in place: no shape change, priority untouched.
            return Some(std::mem::replace(raw.value_mut(existing), value));
        }
        let meta = self.rng.next_u64();
        let node = raw.alloc_node(key, value, meta);
        let root = raw.root();
        let (low, high) = Self::split(raw, root, node);
        let low_with_node = Self::merge(raw, low, node);
        let new_root = Self::merge(raw, low_with_node, high);
        raw.set_root(new_root);
        None
    }

    fn remove<Q>(&mut self, raw: &mut RawTree<K, V, u64>, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = raw.find(key);
        if node.is_nil() {
            return None;
        }
        // Merging the children preserves heap order below the hole.
        let left = raw.left(node);
        let right = raw.right(node);
        let merged = Self::merge(raw, left, right);
        raw.transplant(node, merged);
        let freed = raw.free_node(node);
        Some(freed.value)
    }
}
