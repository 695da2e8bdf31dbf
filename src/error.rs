//! Error types for the tree map facade.
//!
//! Every error here is a local, synchronous fault: the operation that
//! detects it aborts without mutating the tree and reports to the caller.
//! Internal invariant breaches (a vacant arena slot, a missing child during
//! a rotation that requires one) are programming defects and panic instead
//! of being reported through [`TreeMapError`].

/// Errors reported by the fallible [`TreeMap`] accessors.
///
/// # Examples
///
/// ```rust
/// use ordtrees::error::TreeMapError;
/// use ordtrees::tree::BinarySearchTree;
///
/// let mut map: BinarySearchTree<i32, &str> = BinarySearchTree::new();
/// assert_eq!(map.value(&7), Err(TreeMapError::KeyNotFound));
/// assert_eq!(map.min(), Err(TreeMapError::EmptyContainer));
/// ```
///
/// [`TreeMap`]: crate::tree::TreeMap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMapError {
    /// An indexed lookup was performed on a key that is not present.
    KeyNotFound,
    /// `min`/`max` was requested on an empty tree.
    EmptyContainer,
}

impl std::fmt::Display for TreeMapError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound => write!(formatter, "key not found in tree"),
            Self::EmptyContainer => write!(formatter, "operation requires a non-empty tree"),
        }
    }
}

impl std::error::Error for TreeMapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_not_found_display() {
        assert_eq!(
            format!("{}", TreeMapError::KeyNotFound),
            "key not found in tree"
        );
    }

    #[test]
    fn test_empty_container_display() {
        assert_eq!(
            format!("{}", TreeMapError::EmptyContainer),
            "operation requires a non-empty tree"
        );
    }
}
