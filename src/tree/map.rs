//! The tree map facade: one engine composed with one balancing strategy.

use std::borrow::Borrow;
use std::fmt;

use crate::error::TreeMapError;

use super::arena::NodeId;
use super::balance::{
    AvlBalance, BalanceStrategy, Color, RedBlackBalance, SplayBalance, TreapBalance, Unbalanced,
};
use super::links::RawTree;
use super::traverse::{
    InOrderIter, InOrderReverseIter, IntoIter, PostOrderIter, PostOrderReverseIter, PreOrderIter,
    PreOrderReverseIter,
};

/// An ordered map from `K` to `V` backed by a binary search tree with a
/// pluggable balancing strategy.
///
/// Use the aliases for the concrete variants: [`BinarySearchTree`],
/// [`AvlTreeMap`], [`RedBlackTreeMap`], [`SplayTreeMap`], [`TreapMap`].
///
/// Keys are unique and immutable while in the map; inserting an existing
/// key overwrites its value in place without changing the tree shape.
/// Lookups take `&mut self` because the splay variant restructures the
/// tree on every access; [`peek`](Self::peek) is the shared read-only
/// lookup for the variants that do not.
///
/// # Time Complexity
///
/// | Operation        | Balanced variants | Plain BST (worst) |
/// |------------------|-------------------|-------------------|
/// | `insert`         | O(log N)          | O(N)              |
/// | `remove`         | O(log N)          | O(N)              |
/// | `get` / `peek`   | O(log N)          | O(N)              |
/// | `min` / `max`    | O(log N)          | O(N)              |
/// | `len`            | O(1)              | O(1)              |
/// | `clear`          | O(1)              | O(1)              |
///
/// The splay bound is amortized; a single access may cost O(N).
///
/// # Examples
///
/// ```rust
/// use ordtrees::tree::AvlTreeMap;
///
/// let mut map = AvlTreeMap::new();
/// map.insert(3, "three");
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.get(&2), Some(&"two"));
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
/// ```
pub struct TreeMap<K: Ord, V, S: BalanceStrategy<K, V>> {
    raw: RawTree<K, V, S::Meta>,
    strategy: S,
    length: usize,
}

/// Plain binary search tree: no rebalancing, no shape guarantee.
pub type BinarySearchTree<K, V> = TreeMap<K, V, Unbalanced>;

/// AVL tree: sibling subtree heights differ by at most one.
pub type AvlTreeMap<K, V> = TreeMap<K, V, AvlBalance>;

/// Red-black tree: black-height uniform, no red node with a red child.
pub type RedBlackTreeMap<K, V> = TreeMap<K, V, RedBlackBalance>;

/// Splay tree: the most recently accessed key sits at the root.
pub type SplayTreeMap<K, V> = TreeMap<K, V, SplayBalance>;

/// Treap: BST on keys, max-heap on random per-node priorities.
pub type TreapMap<K, V> = TreeMap<K, V, TreapBalance>;

impl<K: Ord, V, S: BalanceStrategy<K, V>> TreeMap<K, V, S> {
    /// Creates an empty map with the strategy's default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(S::default())
    }

    /// Creates an empty map with an explicitly configured strategy.
    ///
    /// The treap is the variant that needs this: a seeded generator makes
    /// its shape reproducible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtrees::tree::{TreapBalance, TreapMap};
    ///
    /// let mut map: TreapMap<i32, i32> =
    ///     TreapMap::with_strategy(TreapBalance::with_seed(42));
    /// map.insert(1, 10);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub fn with_strategy(strategy: S) -> Self {
        Self {
            raw: RawTree::new(),
            strategy,
            length: 0,
        }
    }

    /// Number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// An overwrite replaces the value in place: the tree shape does not
    /// change and no rebalancing runs (the splay variant still counts the
    /// overwrite as an access and moves the node to the root).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtrees::tree::RedBlackTreeMap;
    ///
    /// let mut map = RedBlackTreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.strategy.insert(&mut self.raw, key, value);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }

    /// Removes a key, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op and returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtrees::tree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.strategy.remove(&mut self.raw, key);
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    /// Returns a reference to the value for `key`.
    ///
    /// Takes `&mut self`: a successful splay-tree lookup moves the node
    /// to the root. The other variants do not restructure.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.raw.find(key);
        if node.is_nil() {
            return None;
        }
        self.strategy.after_access(&mut self.raw, node);
        Some(self.raw.value(node))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.raw.find(key);
        if node.is_nil() {
            return None;
        }
        self.strategy.after_access(&mut self.raw, node);
        Some(self.raw.value_mut(node))
    }

    /// Read-only lookup that never restructures, for any variant.
    ///
    /// On a splay tree this deliberately skips the move-to-root step, so
    /// it does not count as an access.
    #[must_use]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.raw.find(key);
        if node.is_nil() {
            None
        } else {
            Some(self.raw.value(node))
        }
    }

    /// Returns `true` if `key` is present. Counts as an access.
    pub fn contains_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Indexed access: the value for `key`, or
    /// [`TreeMapError::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// [`TreeMapError::KeyNotFound`] if the key is absent.
    pub fn value<Q>(&mut self, key: &Q) -> Result<&V, TreeMapError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(TreeMapError::KeyNotFound)
    }

    /// The entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyContainer`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtrees::tree::BinarySearchTree;
    ///
    /// let mut map = BinarySearchTree::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    /// assert_eq!(map.min(), Ok((&1, &"one")));
    /// ```
    pub fn min(&self) -> Result<(&K, &V), TreeMapError> {
        let node = self.raw.min_in_subtree(self.raw.root());
        if node.is_nil() {
            Err(TreeMapError::EmptyContainer)
        } else {
            Ok(self.raw.entry(node))
        }
    }

    /// The entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`TreeMapError::EmptyContainer`] if the map is empty.
    pub fn max(&self) -> Result<(&K, &V), TreeMapError> {
        let node = self.raw.max_in_subtree(self.raw.root());
        if node.is_nil() {
            Err(TreeMapError::EmptyContainer)
        } else {
            Ok(self.raw.entry(node))
        }
    }

    /// Height of the tree: 0 when empty, 1 for a single node.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.subtree_height(self.raw.root())
    }

    /// Key currently at the root, if any.
    ///
    /// Diagnostic accessor; the splay variant's defining behavior is that
    /// this is the most recently accessed key.
    #[must_use]
    pub fn root_key(&self) -> Option<&K> {
        let root = self.raw.root();
        if root.is_nil() {
            None
        } else {
            Some(self.raw.key(root))
        }
    }

    /// Resets the map to empty in O(1) by dropping the whole node store.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.length = 0;
    }

    /// Recursive range check confirming the BST order invariant.
    ///
    /// A diagnostic hook for tests; the operations never call it.
    #[must_use]
    pub fn is_valid_bst(&self) -> bool {
        self.bst_in_range(self.raw.root(), None, None)
    }

    fn bst_in_range(&self, node: NodeId, low: Option<&K>, high: Option<&K>) -> bool {
        if node.is_nil() {
            return true;
        }
        let key = self.raw.key(node);
        if low.is_some_and(|bound| key <= bound) || high.is_some_and(|bound| key >= bound) {
            return false;
        }
        self.bst_in_range(self.raw.left(node), low, Some(key))
            && self.bst_in_range(self.raw.right(node), Some(key), high)
    }

    /// Entries in ascending key order. Same as [`in_order`](Self::in_order).
    #[must_use]
    pub fn iter(&self) -> InOrderIter<'_, K, V, S::Meta> {
        self.in_order()
    }

    /// In-order traversal (left, root, right): ascending keys.
    #[must_use]
    pub fn in_order(&self) -> InOrderIter<'_, K, V, S::Meta> {
        InOrderIter::new(&self.raw)
    }

    /// Reverse in-order traversal (right, root, left): descending keys.
    #[must_use]
    pub fn in_order_reverse(&self) -> InOrderReverseIter<'_, K, V, S::Meta> {
        InOrderReverseIter::new(&self.raw)
    }

    /// Pre-order traversal: root, left, right.
    #[must_use]
    pub fn pre_order(&self) -> PreOrderIter<'_, K, V, S::Meta> {
        PreOrderIter::new(&self.raw)
    }

    /// The pre-order sequence replayed backwards.
    #[must_use]
    pub fn pre_order_reverse(&self) -> PreOrderReverseIter<'_, K, V, S::Meta> {
        PreOrderReverseIter::new(&self.raw)
    }

    /// Post-order traversal: left, right, root.
    #[must_use]
    pub fn post_order(&self) -> PostOrderIter<'_, K, V, S::Meta> {
        PostOrderIter::new(&self.raw)
    }

    /// The post-order sequence replayed backwards.
    #[must_use]
    pub fn post_order_reverse(&self) -> PostOrderReverseIter<'_, K, V, S::Meta> {
        PostOrderReverseIter::new(&self.raw)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.in_order().map(|(key, _)| key)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.in_order().map(|(_, value)| value)
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Checks the AVL shape invariant and the cached heights.
    ///
    /// Diagnostic for tests: `true` iff every node's child subtree
    /// heights differ by at most one and every cached height is accurate.
    #[must_use]
    pub fn is_height_balanced(&self) -> bool {
        self.avl_check(self.raw.root()).is_some()
    }

    /// Returns the subtree height, or `None` on the first violation.
    fn avl_check(&self, node: NodeId) -> Option<u32> {
        if node.is_nil() {
            return Some(0);
        }
        let left = self.avl_check(self.raw.left(node))?;
        let right = self.avl_check(self.raw.right(node))?;
        if left.abs_diff(right) > 1 {
            return None;
        }
        let height = 1 + left.max(right);
        if *self.raw.meta(node) != height {
            return None;
        }
        Some(height)
    }
}

impl<K: Ord, V> RedBlackTreeMap<K, V> {
    /// Checks the red-black invariants.
    ///
    /// Diagnostic for tests: `true` iff the root is black (or the tree is
    /// empty), no red node has a red child, and every root-to-nil path
    /// crosses the same number of black nodes.
    #[must_use]
    pub fn is_valid_red_black(&self) -> bool {
        let root = self.raw.root();
        if root.is_nil() {
            return true;
        }
        if *self.raw.meta(root) != Color::Black {
            return false;
        }
        self.black_height(root).is_some()
    }

    /// Returns the black-height of the subtree, or `None` on a violation.
    fn black_height(&self, node: NodeId) -> Option<u32> {
        if node.is_nil() {
            return Some(1);
        }
        let color = *self.raw.meta(node);
        if color == Color::Red {
            for child in [self.raw.left(node), self.raw.right(node)] {
                if !child.is_nil() && *self.raw.meta(child) == Color::Red {
                    return None;
                }
            }
        }
        let left = self.black_height(self.raw.left(node))?;
        let right = self.black_height(self.raw.right(node))?;
        if left != right {
            return None;
        }
        Some(left + u32::from(color == Color::Black))
    }
}

impl<K: Ord, V> TreapMap<K, V> {
    /// Checks the max-heap invariant on priorities.
    ///
    /// Diagnostic for tests: `true` iff every node's priority is at least
    /// as large as both children's.
    #[must_use]
    pub fn is_heap_ordered(&self) -> bool {
        self.heap_check(self.raw.root())
    }

    fn heap_check(&self, node: NodeId) -> bool {
        if node.is_nil() {
            return true;
        }
        for child in [self.raw.left(node), self.raw.right(node)] {
            if !child.is_nil() && self.raw.meta(child) > self.raw.meta(node) {
                return false;
            }
        }
        self.heap_check(self.raw.left(node)) && self.heap_check(self.raw.right(node))
    }
}

impl<K: Ord, V, S: BalanceStrategy<K, V>> Default for TreeMap<K, V, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> fmt::Debug for TreeMap<K, V, S>
where
    K: Ord + fmt::Debug,
    V: fmt::Debug,
    S: BalanceStrategy<K, V>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.in_order()).finish()
    }
}

impl<K: Ord, V, S: BalanceStrategy<K, V>> FromIterator<(K, V)> for TreeMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = Self::new();
        map.extend(entries);
        map
    }
}

impl<K: Ord, V, S: BalanceStrategy<K, V>> Extend<(K, V)> for TreeMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V, S: BalanceStrategy<K, V>> IntoIterator for &'a TreeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = InOrderIter<'a, K, V, S::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<K: Ord, V, S: BalanceStrategy<K, V>> IntoIterator for TreeMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, S::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_formats_as_map() {
        let mut map: BinarySearchTree<i32, &str> = BinarySearchTree::new();
        map.insert(2, "two");
        map.insert(1, "one");
        assert_eq!(format!("{map:?}"), r#"{1: "one", 2: "two"}"#);
    }

    #[test]
    fn test_from_iterator_collects_sorted() {
        let map: AvlTreeMap<i32, i32> = [(3, 30), (1, 10), (2, 20)].into_iter().collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert!(map.is_height_balanced());
    }

    #[test]
    fn test_into_iterator_yields_owned_entries() {
        let map: RedBlackTreeMap<i32, String> =
            [(2, "b".to_string()), (1, "a".to_string())].into_iter().collect();
        let entries: Vec<(i32, String)> = map.into_iter().collect();
        assert_eq!(entries, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn test_peek_does_not_splay() {
        let mut map: SplayTreeMap<i32, i32> = SplayTreeMap::new();
        for key in [10, 20, 5] {
            map.insert(key, key);
        }
        assert_eq!(map.root_key(), Some(&5));
        assert_eq!(map.peek(&20), Some(&20));
        assert_eq!(map.root_key(), Some(&5), "peek must not restructure");
    }
}
