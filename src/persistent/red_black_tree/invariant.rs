//! Runtime check of the invariants the node types cannot express.
//!
//! No red node has a red child and the root is black; both are structural.
//! What remains is search order, uniform black height and the cached length.

use thiserror::Error;

use super::node::Subtree;

/// A broken Red-Black Tree invariant, reported by
/// [`RedBlackTree::validate`](super::RedBlackTree::validate).
///
/// Trees built through the public API never produce one; a violation is a
/// defect in the tree, not a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// An element is not strictly between the elements bounding its subtree.
    #[error("search order violated at depth {depth}")]
    OutOfOrder {
        /// Depth of the offending node (the root is at depth 0).
        depth: usize,
    },
    /// The two subtrees of a node have different black heights.
    #[error("black height differs below depth {depth}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Depth of the node whose subtrees disagree.
        depth: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// The cached length does not match the number of nodes.
    #[error("cached length {cached} differs from node count {counted}")]
    LengthMismatch {
        /// Length stored in the tree.
        cached: usize,
        /// Number of nodes found by the walk.
        counted: usize,
    },
}

struct Summary {
    black_height: usize,
    count: usize,
}

/// Validates the tree rooted at `root` and returns its black height.
pub(crate) fn validate<T: Ord>(
    root: Subtree<'_, T>,
    cached_length: usize,
) -> Result<usize, InvariantViolation> {
    let result = summarize(root, None, None, 0).and_then(|summary| {
        if summary.count == cached_length {
            Ok(summary.black_height)
        } else {
            Err(InvariantViolation::LengthMismatch {
                cached: cached_length,
                counted: summary.count,
            })
        }
    });

    if let Err(violation) = &result {
        tracing::debug!(%violation, "red-black tree invariant violated");
    }
    result
}

fn summarize<'a, T: Ord>(
    subtree: Subtree<'a, T>,
    lower: Option<&'a T>,
    upper: Option<&'a T>,
    depth: usize,
) -> Result<Summary, InvariantViolation> {
    let Some((left, element, right)) = subtree.split() else {
        return Ok(Summary {
            black_height: 0,
            count: 0,
        });
    };

    if lower.is_some_and(|lower| element <= lower)
        || upper.is_some_and(|upper| element >= upper)
    {
        return Err(InvariantViolation::OutOfOrder { depth });
    }

    let left_summary = summarize(left, lower, Some(element), depth + 1)?;
    let right_summary = summarize(right, Some(element), upper, depth + 1)?;

    if left_summary.black_height != right_summary.black_height {
        return Err(InvariantViolation::BlackHeightMismatch {
            depth,
            left: left_summary.black_height,
            right: right_summary.black_height,
        });
    }

    Ok(Summary {
        black_height: left_summary.black_height + subtree.black_weight(),
        count: left_summary.count + right_summary.count + 1,
    })
}

// =============================================================================
// Tests
// =============================================================================
