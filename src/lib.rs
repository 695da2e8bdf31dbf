//! # ordtrees
//!
//! Ordered key-value maps backed by binary search trees.
//!
//! ## Overview
//!
//! This library provides a single generic tree engine and five balancing
//! policies that plug into it:
//!
//! - [`BinarySearchTree`]: plain BST, no rebalancing
//! - [`AvlTreeMap`]: AVL height rebalancing
//! - [`RedBlackTreeMap`]: red-black color rebalancing
//! - [`SplayTreeMap`]: move-to-root restructuring on every access
//! - [`TreapMap`]: randomized heap priorities via split/merge
//!
//! All five share one node store, one set of structural primitives
//! (rotation, transplant, successor relink) and one non-recursive traversal
//! engine producing six orders: in-order, pre-order and post-order, each
//! forward and reverse.
//!
//! ## Example
//!
//! ```rust
//! use ordtrees::prelude::*;
//!
//! let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```
//!
//! [`BinarySearchTree`]: tree::BinarySearchTree
//! [`AvlTreeMap`]: tree::AvlTreeMap
//! [`RedBlackTreeMap`]: tree::RedBlackTreeMap
//! [`SplayTreeMap`]: tree::SplayTreeMap
//! [`TreapMap`]: tree::TreapMap

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the tree map types and the error type.
///
/// # Usage
///
/// ```rust
/// use ordtrees::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::TreeMapError;
    pub use crate::tree::{
        AvlTreeMap, BinarySearchTree, RedBlackTreeMap, SplayTreeMap, TreapMap, TreeMap,
    };
}

pub mod error;
pub mod tree;
