//! Persistent (immutable) ordered set based on Red-Black Tree.
//!
//! This module provides [`RedBlackTree`], an immutable ordered set that uses
//! structural sharing for efficient operations.
//!
//! # Overview
//!
//! - O(log N) insert, with O(log N) new nodes per insert
//! - O(log N) contains/get
//! - O(log N) min/max
//! - O(N) flatten and in-order iteration
//! - O(1) len, `is_empty` and clone
//!
//! Insertion never modifies an existing tree; it rebuilds the path from the
//! root to the insertion point and shares every other subtree.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::RedBlackTree;
//!
//! let tree = RedBlackTree::empty()
//!     .insert(3)
//!     .insert(1)
//!     .insert(4)
//!     .insert(1)
//!     .insert(5);
//!
//! // Elements are always in ascending order, duplicates collapse
//! assert_eq!(tree.flatten(), vec![1, 3, 4, 5]);
//!
//! // Earlier versions stay usable
//! let larger = tree.insert(9);
//! assert_eq!(tree.len(), 4);
//! assert_eq!(larger.len(), 5);
//! ```
//!
//! # Internal Structure
//!
//! The Red-Black Tree maintains the following invariants:
//! 1. Every element in a left subtree is smaller, every element in a right
//!    subtree is larger
//! 2. Red nodes have only black children (or leaves)
//! 3. Every path from root to leaf has the same number of black nodes
//! 4. The root is black
//!
//! Invariants 2 and 4 are enforced by the node types. Invariants 1 and 3 can
//! be checked with [`RedBlackTree::validate`]. Together they bound the height
//! by `2 * log2(N + 1)`.

mod insertion;
mod invariant;
mod node;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};

use smallvec::SmallVec;

use self::insertion::Inserter;
use self::node::{BlackNode, Subtree};

pub use self::invariant::InvariantViolation;

/// Inline capacity of the traversal stack. Trees of up to about four billion
/// elements never spill to the heap.
const INLINE_STACK_DEPTH: usize = 64;

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// A persistent (immutable) ordered set based on Red-Black Tree.
///
/// Elements must implement `Ord`. Every element appears at most once;
/// inserting an element equal to a stored one replaces the stored one.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `empty`        | O(1)       |
/// | `insert`       | O(log N)   |
/// | `contains`     | O(log N)   |
/// | `min`/`max`    | O(log N)   |
/// | `flatten`      | O(N)       |
/// | `len`          | O(1)       |
/// | `clone`        | O(1)       |
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::RedBlackTree;
///
/// let tree: RedBlackTree<i32> = [5, 2, 8].into_iter().collect();
/// assert!(tree.contains(&2));
/// assert_eq!(tree.flatten(), vec![2, 5, 8]);
/// ```
#[derive(Clone)]
pub struct RedBlackTree<T> {
    /// Root node; black by construction
    root: BlackNode<T>,
    /// Number of elements
    length: usize,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(RedBlackTree<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(RedBlackTree<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(RedBlackTree<i32>: Send, Sync);

impl<T> RedBlackTree<T> {
    /// Creates an empty tree.
    ///
    /// The empty tree owns no nodes, so creating one never allocates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::empty();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.flatten(), Vec::<i32>::new());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            root: BlackNode::Leaf,
            length: 0,
        }
    }

    /// Creates an empty tree. Same as [`empty`](Self::empty).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::empty()
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// The iterator walks the tree lazily with an explicit stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree = RedBlackTree::empty().insert(2).insert(3).insert(1);
    /// let elements: Vec<&i32> = tree.iter().collect();
    /// assert_eq!(elements, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> RedBlackTreeIterator<'_, T> {
        RedBlackTreeIterator::new(self.root.as_subtree(), self.length)
    }

    /// Returns the number of nodes on the longest path from the root to a leaf.
    ///
    /// An empty tree has height 0. For a tree of N elements the height never
    /// exceeds `2 * log2(N + 1)`.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = (0..1000).collect();
    /// assert!(tree.height() <= 20);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        Self::height_of(self.root.as_subtree())
    }

    fn height_of(subtree: Subtree<'_, T>) -> usize {
        subtree.split().map_or(0, |(left, _, right)| {
            1 + Self::height_of(left).max(Self::height_of(right))
        })
    }

    /// Returns the number of black nodes on the leftmost root-to-leaf path.
    ///
    /// In a valid tree every root-to-leaf path has this many black nodes.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn black_height(&self) -> usize {
        let mut black_height = 0;
        let mut subtree = self.root.as_subtree();
        while let Some((left, _, _)) = subtree.split() {
            black_height += subtree.black_weight();
            subtree = left;
        }
        black_height
    }
}

impl<T: Clone + Ord> RedBlackTree<T> {
    /// Creates a tree containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree = RedBlackTree::singleton(7);
    /// assert_eq!(tree.flatten(), vec![7]);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::empty().insert(element)
    }

    /// Inserts an element into the tree.
    ///
    /// Returns a new tree containing `element` and every element of `self`;
    /// `self` is left untouched. If an equal element is already present it
    /// is replaced by `element`, and the length does not change.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree1 = RedBlackTree::empty().insert(1);
    /// let tree2 = tree1.insert(2);
    ///
    /// assert_eq!(tree1.flatten(), vec![1]);    // Original unchanged
    /// assert_eq!(tree2.flatten(), vec![1, 2]); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        let mut inserter = Inserter::new();
        let root = inserter.insert(&self.root, element).blacken();
        let length = if inserter.added() {
            self.length + 1
        } else {
            self.length
        };
        tracing::trace!(length, added = inserter.added(), "red-black tree insert");

        Self {
            root: BlackNode::Black(root),
            length,
        }
    }

    /// Returns the elements in ascending order.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = [3, 1, 4, 1, 5, 9, 2, 6].into_iter().collect();
    /// assert_eq!(tree.flatten(), vec![1, 2, 3, 4, 5, 6, 9]);
    /// ```
    #[must_use]
    pub fn flatten(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Returns `true` if the tree contains an element equal to `element`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree = RedBlackTree::empty().insert("apple".to_string());
    /// assert!(tree.contains("apple"));
    /// assert!(!tree.contains("pear"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(element).is_some()
    }

    /// Returns a reference to the stored element equal to `element`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut subtree = self.root.as_subtree();
        while let Some((left, candidate, right)) = subtree.split() {
            match element.cmp(candidate.borrow()) {
                Ordering::Less => subtree = left,
                Ordering::Greater => subtree = right,
                Ordering::Equal => return Some(candidate),
            }
        }
        None
    }

    /// Returns the smallest element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = [4, 2, 9].into_iter().collect();
    /// assert_eq!(tree.min(), Some(&2));
    /// assert_eq!(tree.max(), Some(&9));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        let mut subtree = self.root.as_subtree();
        let mut smallest = None;
        while let Some((left, element, _)) = subtree.split() {
            smallest = Some(element);
            subtree = left;
        }
        smallest
    }

    /// Returns the largest element.
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        let mut subtree = self.root.as_subtree();
        let mut largest = None;
        while let Some((_, element, right)) = subtree.split() {
            largest = Some(element);
            subtree = right;
        }
        largest
    }

    /// Checks the tree's invariants and returns its black height.
    ///
    /// Search order, uniform black height and the cached length are
    /// verified; the absence of red-red pairs and the black root follow
    /// from the node types. Trees built through this API always pass.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = (0..100).collect();
    /// assert_eq!(tree.validate(), Ok(tree.black_height()));
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        invariant::validate(self.root.as_subtree(), self.length)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An in-order iterator over the elements of a [`RedBlackTree`].
pub struct RedBlackTreeIterator<'a, T> {
    /// Elements still to yield, each paired with its right subtree
    stack: SmallVec<[(&'a T, Subtree<'a, T>); INLINE_STACK_DEPTH]>,
    remaining: usize,
}

impl<'a, T> RedBlackTreeIterator<'a, T> {
    fn new(root: Subtree<'a, T>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.descend_left(root);
        iterator
    }

    fn descend_left(&mut self, mut subtree: Subtree<'a, T>) {
        while let Some((left, element, right)) = subtree.split() {
            self.stack.push((element, right));
            subtree = left;
        }
    }
}

impl<'a, T> Iterator for RedBlackTreeIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (element, right) = self.stack.pop()?;
        self.descend_left(right);
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for RedBlackTreeIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for RedBlackTreeIterator<'_, T> {}

/// An owning iterator over the elements of a [`RedBlackTree`].
///
/// Elements are moved out of nodes the consumed tree owns exclusively.
/// Nodes still shared with another tree are cloned, so consuming the last
/// handle to a tree costs no element clones.
pub struct RedBlackTreeIntoIterator<T> {
    elements: std::vec::IntoIter<T>,
}

impl<T> Iterator for RedBlackTreeIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<T> DoubleEndedIterator for RedBlackTreeIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.elements.next_back()
    }
}

impl<T> ExactSizeIterator for RedBlackTreeIntoIterator<T> {
    fn len(&self) -> usize {
        self.elements.len()
    }
}

impl<T> FusedIterator for RedBlackTreeIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for RedBlackTree<T> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone + Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |tree, element| tree.insert(element))
    }
}

impl<T: Clone> IntoIterator for RedBlackTree<T> {
    type Item = T;
    type IntoIter = RedBlackTreeIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut elements = Vec::with_capacity(self.length);
        node::Node::from(self.root).drain_into(&mut elements);
        RedBlackTreeIntoIterator {
            elements: elements.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = RedBlackTreeIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for RedBlackTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RedBlackTree<T> {}

/// Computes a hash value for this tree.
///
/// The length is hashed first, then every element in ascending order, so
/// trees holding the same elements hash alike regardless of insertion order.
impl<T: Hash> Hash for RedBlackTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for RedBlackTree<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for RedBlackTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct RedBlackTreeVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> RedBlackTreeVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for RedBlackTreeVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    type Value = RedBlackTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = RedBlackTree::empty();
        let mut decoded = 0_usize;
        while let Some(element) = seq.next_element()? {
            tree = tree.insert(element);
            decoded += 1;
        }
        tracing::debug!(decoded, length = tree.len(), "deserialized red-black tree");
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for RedBlackTree<T>
where
    T: serde::Deserialize<'de> + Clone + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(RedBlackTreeVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Send + Sync Tests
// =============================================================================

#[cfg(all(test, feature = "arc"))]
mod send_sync_tests {
    use super::*;
    use rstest::rstest;

    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}

    #[rstest]
    fn test_tree_is_send_and_sync() {
        assert_send::<RedBlackTree<i32>>();
        assert_sync::<RedBlackTree<i32>>();
        assert_send::<RedBlackTree<String>>();
        assert_sync::<RedBlackTree<String>>();
    }

    #[rstest]
    fn test_iterators_are_send() {
        assert_send::<RedBlackTreeIterator<'static, i32>>();
        assert_send::<RedBlackTreeIntoIterator<i32>>();
    }
}

// =============================================================================
// Multithread Tests (arc feature only)
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_empty() {
        let tree: RedBlackTree<i32> = RedBlackTree::empty();
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[]");
    }

    #[rstest]
    fn test_serialize_in_ascending_order() {
        let tree: RedBlackTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[1,2,3]");
    }

    #[rstest]
    fn test_deserialize_collapses_duplicates() {
        let tree: RedBlackTree<i32> = serde_json::from_str("[5,1,5,3]").unwrap();
        assert_eq!(tree.flatten(), vec![1, 3, 5]);
        assert!(tree.validate().is_ok());
    }

    #[rstest]
    fn test_roundtrip_large() {
        let tree: RedBlackTree<i32> = (0..1000).rev().collect();
        let json = serde_json::to_string(&tree).unwrap();
        let restored: RedBlackTree<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, restored);
    }

    #[rstest]
    fn test_deserialize_rejects_non_sequence() {
        let result: Result<RedBlackTree<i32>, _> = serde_json::from_str("{\"a\":1}");
        assert!(result.is_err());
    }
}
