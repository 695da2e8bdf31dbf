//! Traversal engine: six lazy, restartable orders over a tree.
//!
//! Every iterator here is an explicit state object driven by a stack: no
//! recursion in `next`, no generator machinery. The in-order pair and the
//! forward pre-order advance one bounded step per element; the reversed
//! pre-order and both post-orders materialize the visit order into an
//! auxiliary stack up front and replay it, which keeps their `next` O(1).
//!
//! Iterators borrow the tree, so the borrow checker rules out mutation
//! while a traversal is in flight.

use smallvec::SmallVec;

use super::arena::{NodeId, Slot};
use super::links::RawTree;

type Stack = SmallVec<[NodeId; 16]>;

/// In-order (left, root, right): keys in ascending order.
#[derive(Debug)]
pub struct InOrderIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    stack: Stack,
}

impl<'a, K, V, M> InOrderIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        let mut iterator = Self {
            raw,
            stack: SmallVec::new(),
        };
        iterator.push_left_spine(raw.root());
        iterator
    }

    fn push_left_spine(&mut self, mut node: NodeId) {
        while !node.is_nil() {
            self.stack.push(node);
            node = self.raw.left(node);
        }
    }
}

impl<'a, K, V, M> Iterator for InOrderIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(self.raw.right(node));
        Some(self.raw.entry(node))
    }
}

/// Reverse in-order (right, root, left): keys in descending order.
#[derive(Debug)]
pub struct InOrderReverseIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    stack: Stack,
}

impl<'a, K, V, M> InOrderReverseIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        let mut iterator = Self {
            raw,
            stack: SmallVec::new(),
        };
        iterator.push_right_spine(raw.root());
        iterator
    }

    fn push_right_spine(&mut self, mut node: NodeId) {
        while !node.is_nil() {
            self.stack.push(node);
            node = self.raw.right(node);
        }
    }
}

impl<'a, K, V, M> Iterator for InOrderReverseIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_right_spine(self.raw.left(node));
        Some(self.raw.entry(node))
    }
}

/// Pre-order (root, left, right).
#[derive(Debug)]
pub struct PreOrderIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    stack: Stack,
}

impl<'a, K, V, M> PreOrderIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        let mut stack = SmallVec::new();
        if !raw.root().is_nil() {
            stack.push(raw.root());
        }
        Self { raw, stack }
    }
}

impl<'a, K, V, M> Iterator for PreOrderIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first so the left subtree is produced first.
        let right = self.raw.right(node);
        if !right.is_nil() {
            self.stack.push(right);
        }
        let left = self.raw.left(node);
        if !left.is_nil() {
            self.stack.push(left);
        }
        Some(self.raw.entry(node))
    }
}

/// Reverse pre-order: the pre-order sequence replayed backwards
/// (root, then right subtree reversed, then left subtree reversed,
/// produced back to front).
#[derive(Debug)]
pub struct PreOrderReverseIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    replay: Vec<NodeId>,
}

impl<'a, K, V, M> PreOrderReverseIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        // Materialize the full pre-order onto an auxiliary stack; popping
        // it replays the sequence in reverse.
        let mut replay = Vec::new();
        let mut stack: Stack = SmallVec::new();
        if !raw.root().is_nil() {
            stack.push(raw.root());
        }
        while let Some(node) = stack.pop() {
            replay.push(node);
            let right = raw.right(node);
            if !right.is_nil() {
                stack.push(right);
            }
            let left = raw.left(node);
            if !left.is_nil() {
                stack.push(left);
            }
        }
        Self { raw, replay }
    }
}

impl<'a, K, V, M> Iterator for PreOrderReverseIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.replay.pop()?;
        Some(self.raw.entry(node))
    }
}

/// Collects nodes in root, right, left pop order. Reading the record
/// backwards yields post-order; reading it forwards yields its reverse.
fn collect_root_right_left<K, V, M>(raw: &RawTree<K, V, M>) -> Vec<NodeId> {
    let mut record = Vec::new();
    let mut stack: Stack = SmallVec::new();
    if !raw.root().is_nil() {
        stack.push(raw.root());
    }
    while let Some(node) = stack.pop() {
        record.push(node);
        let left = raw.left(node);
        if !left.is_nil() {
            stack.push(left);
        }
        let right = raw.right(node);
        if !right.is_nil() {
            stack.push(right);
        }
    }
    record
}

/// Post-order (left, right, root).
#[derive(Debug)]
pub struct PostOrderIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    replay: Vec<NodeId>,
}

impl<'a, K, V, M> PostOrderIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        Self {
            raw,
            replay: collect_root_right_left(raw),
        }
    }
}

impl<'a, K, V, M> Iterator for PostOrderIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.replay.pop()?;
        Some(self.raw.entry(node))
    }
}

/// Reverse post-order: the post-order sequence replayed backwards.
#[derive(Debug)]
pub struct PostOrderReverseIter<'a, K, V, M> {
    raw: &'a RawTree<K, V, M>,
    replay: Vec<NodeId>,
    current_index: usize,
}

impl<'a, K, V, M> PostOrderReverseIter<'a, K, V, M> {
    pub(crate) fn new(raw: &'a RawTree<K, V, M>) -> Self {
        Self {
            raw,
            replay: collect_root_right_left(raw),
            current_index: 0,
        }
    }
}

impl<'a, K, V, M> Iterator for PostOrderReverseIter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = *self.replay.get(self.current_index)?;
        self.current_index += 1;
        Some(self.raw.entry(node))
    }
}

/// Owning in-order iterator, moving entries out of the arena.
#[derive(Debug)]
pub struct IntoIter<K, V, M> {
    slots: Vec<Slot<K, V, M>>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V, M> IntoIter<K, V, M> {
    pub(crate) fn new(raw: RawTree<K, V, M>) -> Self {
        let mut order = Vec::new();
        let mut stack: Stack = SmallVec::new();
        let mut node = raw.root();
        // In-order id collection with an explicit stack.
        loop {
            while !node.is_nil() {
                stack.push(node);
                node = raw.left(node);
            }
            let Some(current) = stack.pop() else { break };
            order.push(current);
            node = raw.right(current);
        }
        Self {
            slots: raw.into_slots(),
            order: order.into_iter(),
        }
    }
}

impl<K, V, M> Iterator for IntoIter<K, V, M> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: NodeId::NIL,
            },
        );
        match slot {
            Slot::Occupied(node) => Some((node.key, node.value)),
            Slot::Vacant { .. } => unreachable!("in-order id points at a vacant slot"),
        }
    }
}
