//! Persistent (immutable) data structures.
//!
//! - [`RedBlackTree`]: Persistent ordered set (Red-Black Tree)
//!
//! # Structural Sharing
//!
//! Insertion allocates new nodes only along the path from the root to the
//! insertion point. Every other subtree is shared by reference between the
//! old and the new tree, so old versions stay valid at no extra cost.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::RedBlackTree;
//!
//! let tree = RedBlackTree::empty().insert(5).insert(1).insert(3);
//! assert_eq!(tree.flatten(), vec![1, 3, 5]);
//!
//! // Structural sharing: the original tree is preserved
//! let extended = tree.insert(2);
//! assert_eq!(tree.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4); // New tree
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets trees cross thread boundaries.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod red_black_tree;

pub use red_black_tree::InvariantViolation;
pub use red_black_tree::RedBlackTree;
pub use red_black_tree::RedBlackTreeIntoIterator;
pub use red_black_tree::RedBlackTreeIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_shares_allocation() {
        let shared: ReferenceCounter<i32> = ReferenceCounter::new(7);
        let alias = ReferenceCounter::clone(&shared);
        assert!(ReferenceCounter::ptr_eq(&shared, &alias));
    }

    #[rstest]
    fn test_reference_counter_unwrap_or_clone_reuses_unique() {
        let unique: ReferenceCounter<Vec<i32>> = ReferenceCounter::new(vec![1, 2]);
        assert_eq!(ReferenceCounter::unwrap_or_clone(unique), vec![1, 2]);

        let shared: ReferenceCounter<Vec<i32>> = ReferenceCounter::new(vec![3]);
        let alias = ReferenceCounter::clone(&shared);
        assert_eq!(ReferenceCounter::unwrap_or_clone(alias), vec![3]);
        assert_eq!(ReferenceCounter::strong_count(&shared), 1);
    }
}
