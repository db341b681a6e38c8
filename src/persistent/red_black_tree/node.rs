//! Node shapes of the Red-Black Tree.
//!
//! Color is part of the type rather than a field. A [`RedBranch`] can only
//! hold [`BlackNode`] children, so a red node with a red child cannot be
//! built, and the tree root is a [`BlackNode`], so a red root cannot be
//! observed.

use crate::persistent::ReferenceCounter;

// =============================================================================
// Node Definitions
// =============================================================================

/// A subtree of either color.
#[derive(Clone)]
pub(crate) enum Node<T> {
    Leaf,
    Black(ReferenceCounter<BlackBranch<T>>),
    Red(ReferenceCounter<RedBranch<T>>),
}

/// A subtree whose top is black. Leaves count as black.
#[derive(Clone)]
pub(crate) enum BlackNode<T> {
    Leaf,
    Black(ReferenceCounter<BlackBranch<T>>),
}

/// A black internal node. Its children may be of either color.
#[derive(Clone)]
pub(crate) struct BlackBranch<T> {
    pub(crate) left: Node<T>,
    pub(crate) element: T,
    pub(crate) right: Node<T>,
}

/// A red internal node. Both children are black or leaves.
#[derive(Clone)]
pub(crate) struct RedBranch<T> {
    pub(crate) left: BlackNode<T>,
    pub(crate) element: T,
    pub(crate) right: BlackNode<T>,
}

impl<T> BlackBranch<T> {
    /// Allocates a black node.
    pub(crate) fn shared(left: Node<T>, element: T, right: Node<T>) -> ReferenceCounter<Self> {
        ReferenceCounter::new(Self {
            left,
            element,
            right,
        })
    }
}

impl<T> RedBranch<T> {
    /// Allocates a red node.
    pub(crate) fn shared(
        left: BlackNode<T>,
        element: T,
        right: BlackNode<T>,
    ) -> ReferenceCounter<Self> {
        ReferenceCounter::new(Self {
            left,
            element,
            right,
        })
    }

    /// Allocates a red node with two leaf children.
    pub(crate) fn singleton(element: T) -> ReferenceCounter<Self> {
        Self::shared(BlackNode::Leaf, element, BlackNode::Leaf)
    }
}

impl<T> From<BlackNode<T>> for Node<T> {
    fn from(node: BlackNode<T>) -> Self {
        match node {
            BlackNode::Leaf => Self::Leaf,
            BlackNode::Black(branch) => Self::Black(branch),
        }
    }
}

impl<T> Node<T> {
    pub(crate) fn as_subtree(&self) -> Subtree<'_, T> {
        match self {
            Self::Leaf => Subtree::Leaf,
            Self::Black(branch) => Subtree::Black(branch),
            Self::Red(branch) => Subtree::Red(branch),
        }
    }
}

impl<T> BlackNode<T> {
    pub(crate) fn as_subtree(&self) -> Subtree<'_, T> {
        match self {
            Self::Leaf => Subtree::Leaf,
            Self::Black(branch) => Subtree::Black(branch),
        }
    }
}

// =============================================================================
// Consuming Traversal
// =============================================================================

impl<T: Clone> Node<T> {
    /// Appends the elements in order, moving them out of nodes this tree
    /// holds the only reference to and cloning the rest.
    pub(crate) fn drain_into(self, elements: &mut Vec<T>) {
        match self {
            Self::Leaf => {}
            Self::Black(branch) => {
                let BlackBranch {
                    left,
                    element,
                    right,
                } = ReferenceCounter::unwrap_or_clone(branch);
                left.drain_into(elements);
                elements.push(element);
                right.drain_into(elements);
            }
            Self::Red(branch) => {
                let RedBranch {
                    left,
                    element,
                    right,
                } = ReferenceCounter::unwrap_or_clone(branch);
                Self::from(left).drain_into(elements);
                elements.push(element);
                Self::from(right).drain_into(elements);
            }
        }
    }
}

// =============================================================================
// Borrowed View
// =============================================================================

/// A borrowed, color-tagged view of a subtree.
///
/// Read-only walks (lookup, traversal, validation) go through this view so
/// they treat both branch types alike.
pub(crate) enum Subtree<'a, T> {
    Leaf,
    Black(&'a BlackBranch<T>),
    Red(&'a RedBranch<T>),
}

impl<T> Clone for Subtree<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Subtree<'_, T> {}

impl<'a, T> Subtree<'a, T> {
    /// Splits an internal node into its left subtree, element and right subtree.
    pub(crate) fn split(self) -> Option<(Self, &'a T, Self)> {
        match self {
            Self::Leaf => None,
            Self::Black(branch) => Some((
                branch.left.as_subtree(),
                &branch.element,
                branch.right.as_subtree(),
            )),
            Self::Red(branch) => Some((
                branch.left.as_subtree(),
                &branch.element,
                branch.right.as_subtree(),
            )),
        }
    }

    /// Returns the black-height contribution of this node.
    pub(crate) const fn black_weight(self) -> usize {
        match self {
            Self::Black(_) => 1,
            Self::Leaf | Self::Red(_) => 0,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_red_singleton_has_leaf_children() {
        let red = RedBranch::singleton(4);
        assert!(matches!(red.left, BlackNode::Leaf));
        assert!(matches!(red.right, BlackNode::Leaf));
        assert_eq!(red.element, 4);
    }

    #[rstest]
    fn test_black_node_converts_to_node() {
        let branch = BlackBranch::shared(Node::Leaf, 1, Node::Leaf);
        let node: Node<i32> = BlackNode::Black(ReferenceCounter::clone(&branch)).into();
        match node {
            Node::Black(converted) => assert!(ReferenceCounter::ptr_eq(&converted, &branch)),
            _ => panic!("expected a black node"),
        }
        assert!(matches!(Node::from(BlackNode::<i32>::Leaf), Node::Leaf));
    }

    #[rstest]
    fn test_split_exposes_children_in_order() {
        let red = RedBranch::singleton(1);
        let root = Node::Black(BlackBranch::shared(Node::Red(red), 2, Node::Leaf));
        let (left, element, right) = root.as_subtree().split().expect("internal node");
        assert_eq!(*element, 2);
        assert!(matches!(left, Subtree::Red(_)));
        assert!(matches!(right, Subtree::Leaf));
        assert!(Subtree::<i32>::Leaf.split().is_none());
    }

    #[rstest]
    fn test_black_weight_counts_only_black_nodes() {
        let black = BlackBranch::shared(Node::Leaf, 1, Node::Leaf);
        let red = RedBranch::singleton(1);
        assert_eq!(Subtree::Black(&black).black_weight(), 1);
        assert_eq!(Subtree::Red(&red).black_weight(), 0);
        assert_eq!(Subtree::<i32>::Leaf.black_weight(), 0);
    }
}
