//! Ordered key-value containers backed by binary search trees.
//!
//! This module is organized as one generic engine plus pluggable balancing
//! policies:
//!
//! - [`arena`](self): node storage, a slot arena addressed by [`NodeId`],
//!   with `left`/`right` as the owning edges and `parent` as a non-owning
//!   back-index, so upward navigation is O(1) without an ownership cycle.
//! - [`RawTree`]: the linkage engine: search descent, single and double
//!   rotations, transplant, and three-case structural removal with
//!   successor relinking.
//! - The traversal iterators ([`InOrderIter`] and friends): six lazy,
//!   restartable orders driven by explicit stacks, never recursion.
//! - [`BalanceStrategy`]: the hook contract (`create_meta`, `after_insert`,
//!   `after_remove`, `after_access`) with five implementations:
//!   [`Unbalanced`], [`AvlBalance`], [`RedBlackBalance`], [`SplayBalance`]
//!   and [`TreapBalance`].
//! - [`TreeMap`]: the facade composing the engine with one strategy, with
//!   per-variant aliases.
//!
//! # Example
//!
//! ```rust
//! use ordtrees::tree::RedBlackTreeMap;
//!
//! let mut map = RedBlackTreeMap::new();
//! for key in [50, 30, 70, 20, 40, 60, 80] {
//!     map.insert(key, key.to_string());
//! }
//!
//! assert_eq!(map.len(), 7);
//! assert!(map.remove(&20).is_some());
//! assert!(map.is_valid_bst());
//! ```

mod arena;
mod balance;
mod links;
mod map;
mod traverse;

pub use arena::NodeId;
pub use balance::{
    AvlBalance, BalanceStrategy, Color, RedBlackBalance, SplayBalance, TreapBalance, Unbalanced,
};
pub use links::{Detached, RawTree};
pub use map::{
    AvlTreeMap, BinarySearchTree, RedBlackTreeMap, SplayTreeMap, TreapMap, TreeMap,
};
pub use traverse::{
    InOrderIter, InOrderReverseIter, IntoIter, PostOrderIter, PostOrderReverseIter, PreOrderIter,
    PreOrderReverseIter,
};
