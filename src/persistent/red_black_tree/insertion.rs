//! Single-pass, top-down insertion.
//!
//! A black node does not recurse into its child and then rebalance the
//! result. It hands its own element and its untouched sibling down to the
//! child, and the child rebuilds the whole neighborhood (child, parent
//! element, sibling) in one step:
//!
//! ```text
//!          x                       x
//!        /   \        ins(e)     /   \
//!       c     r    ─────────►  c'     r      c is Leaf or Black
//!
//!          x                       y
//!        /   \     e < y, a'     /   \
//!    R(a,y,b)  r   is red      B(a')  B(b,x,r)
//! ```
//!
//! A red-red conflict produced below a red child is therefore folded into a
//! red node with two black children before anything is returned past it. The
//! result of the engine is never a leaf and at most its top node is red; the
//! caller blackens it.

use std::cmp::Ordering;

use super::node::{BlackBranch, BlackNode, Node, RedBranch};
use crate::persistent::ReferenceCounter;

// =============================================================================
// Engine Result
// =============================================================================

/// A non-empty subtree returned by the engine. Only the top node may be red.
pub(crate) enum Grown<T> {
    Black(ReferenceCounter<BlackBranch<T>>),
    Red(ReferenceCounter<RedBranch<T>>),
}

impl<T: Clone> Grown<T> {
    /// Forces the top node black. Always legal, and restores a black root.
    pub(crate) fn blacken(self) -> ReferenceCounter<BlackBranch<T>> {
        match self {
            Self::Black(branch) => branch,
            Self::Red(branch) => {
                let RedBranch {
                    left,
                    element,
                    right,
                } = ReferenceCounter::unwrap_or_clone(branch);
                BlackBranch::shared(left.into(), element, right.into())
            }
        }
    }

    fn into_node(self) -> Node<T> {
        match self {
            Self::Black(branch) => Node::Black(branch),
            Self::Red(branch) => Node::Red(branch),
        }
    }
}

// =============================================================================
// Inserter
// =============================================================================

/// Drives one insertion and remembers whether it created a node.
pub(crate) struct Inserter {
    added: bool,
}

impl Inserter {
    pub(crate) const fn new() -> Self {
        Self { added: false }
    }

    /// Returns `true` if the insertion created a node rather than replacing one.
    pub(crate) const fn added(&self) -> bool {
        self.added
    }

    /// Inserts into a black subtree.
    pub(crate) fn insert<T: Clone + Ord>(&mut self, node: &BlackNode<T>, element: T) -> Grown<T> {
        match node {
            BlackNode::Leaf => self.insert_leaf(element),
            BlackNode::Black(branch) => self.insert_black(branch, element),
        }
    }

    fn insert_leaf<T>(&mut self, element: T) -> Grown<T> {
        self.added = true;
        Grown::Red(RedBranch::singleton(element))
    }

    fn insert_black<T: Clone + Ord>(&mut self, branch: &BlackBranch<T>, element: T) -> Grown<T> {
        match element.cmp(&branch.element) {
            Ordering::Equal => Grown::Black(BlackBranch::shared(
                branch.left.clone(),
                element,
                branch.right.clone(),
            )),
            Ordering::Less => {
                self.insert_left(&branch.left, element, &branch.element, &branch.right)
            }
            Ordering::Greater => {
                self.insert_right(&branch.left, &branch.element, &branch.right, element)
            }
        }
    }

    /// Inserts into `child`, the left child of a black node holding `parent`
    /// whose right child is `sibling`, and returns the rebuilt black node's
    /// replacement.
    fn insert_left<T: Clone + Ord>(
        &mut self,
        child: &Node<T>,
        element: T,
        parent: &T,
        sibling: &Node<T>,
    ) -> Grown<T> {
        let grown = match child {
            Node::Red(red) => return self.insert_left_red(red, element, parent, sibling),
            Node::Black(branch) => self.insert_black(branch, element),
            Node::Leaf => self.insert_leaf(element),
        };
        Grown::Black(BlackBranch::shared(
            grown.into_node(),
            parent.clone(),
            sibling.clone(),
        ))
    }

    /// Mirror of [`Self::insert_left`]: `child` is the right child and
    /// `sibling` the left one.
    fn insert_right<T: Clone + Ord>(
        &mut self,
        sibling: &Node<T>,
        parent: &T,
        child: &Node<T>,
        element: T,
    ) -> Grown<T> {
        let grown = match child {
            Node::Red(red) => return self.insert_right_red(sibling, parent, red, element),
            Node::Black(branch) => self.insert_black(branch, element),
            Node::Leaf => self.insert_leaf(element),
        };
        Grown::Black(BlackBranch::shared(
            sibling.clone(),
            parent.clone(),
            grown.into_node(),
        ))
    }

    /// The neighborhood is `B(R(a, y, b), parent, sibling)`.
    fn insert_left_red<T: Clone + Ord>(
        &mut self,
        red: &RedBranch<T>,
        element: T,
        parent: &T,
        sibling: &Node<T>,
    ) -> Grown<T> {
        let wrap = |rebuilt: ReferenceCounter<RedBranch<T>>| {
            Grown::Black(BlackBranch::shared(
                Node::Red(rebuilt),
                parent.clone(),
                sibling.clone(),
            ))
        };

        match element.cmp(&red.element) {
            Ordering::Equal => wrap(RedBranch::shared(
                red.left.clone(),
                element,
                red.right.clone(),
            )),
            Ordering::Less => match self.insert(&red.left, element) {
                // R(B(p, z, q), y, B(b, parent, sibling))
                Grown::Red(grandchild) => Grown::Red(RedBranch::shared(
                    BlackNode::Black(Grown::Red(grandchild).blacken()),
                    red.element.clone(),
                    BlackNode::Black(BlackBranch::shared(
                        red.right.clone().into(),
                        parent.clone(),
                        sibling.clone(),
                    )),
                )),
                Grown::Black(grandchild) => wrap(RedBranch::shared(
                    BlackNode::Black(grandchild),
                    red.element.clone(),
                    red.right.clone(),
                )),
            },
            Ordering::Greater => match self.insert(&red.right, element) {
                // R(B(a, y, p), z, B(q, parent, sibling))
                Grown::Red(grandchild) => {
                    let RedBranch {
                        left: inner,
                        element: middle,
                        right: outer,
                    } = ReferenceCounter::unwrap_or_clone(grandchild);
                    Grown::Red(RedBranch::shared(
                        BlackNode::Black(BlackBranch::shared(
                            red.left.clone().into(),
                            red.element.clone(),
                            inner.into(),
                        )),
                        middle,
                        BlackNode::Black(BlackBranch::shared(
                            outer.into(),
                            parent.clone(),
                            sibling.clone(),
                        )),
                    ))
                }
                Grown::Black(grandchild) => wrap(RedBranch::shared(
                    red.left.clone(),
                    red.element.clone(),
                    BlackNode::Black(grandchild),
                )),
            },
        }
    }

    /// The neighborhood is `B(sibling, parent, R(a, y, b))`.
    fn insert_right_red<T: Clone + Ord>(
        &mut self,
        sibling: &Node<T>,
        parent: &T,
        red: &RedBranch<T>,
        element: T,
    ) -> Grown<T> {
        let wrap = |rebuilt: ReferenceCounter<RedBranch<T>>| {
            Grown::Black(BlackBranch::shared(
                sibling.clone(),
                parent.clone(),
                Node::Red(rebuilt),
            ))
        };

        match element.cmp(&red.element) {
            Ordering::Equal => wrap(RedBranch::shared(
                red.left.clone(),
                element,
                red.right.clone(),
            )),
            Ordering::Less => match self.insert(&red.left, element) {
                // R(B(sibling, parent, p), z, B(q, y, b))
                Grown::Red(grandchild) => {
                    let RedBranch {
                        left: outer,
                        element: middle,
                        right: inner,
                    } = ReferenceCounter::unwrap_or_clone(grandchild);
                    Grown::Red(RedBranch::shared(
                        BlackNode::Black(BlackBranch::shared(
                            sibling.clone(),
                            parent.clone(),
                            outer.into(),
                        )),
                        middle,
                        BlackNode::Black(BlackBranch::shared(
                            inner.into(),
                            red.element.clone(),
                            red.right.clone().into(),
                        )),
                    ))
                }
                Grown::Black(grandchild) => wrap(RedBranch::shared(
                    BlackNode::Black(grandchild),
                    red.element.clone(),
                    red.right.clone(),
                )),
            },
            Ordering::Greater => match self.insert(&red.right, element) {
                // R(B(sibling, parent, a), y, B(p, z, q))
                Grown::Red(grandchild) => Grown::Red(RedBranch::shared(
                    BlackNode::Black(BlackBranch::shared(
                        sibling.clone(),
                        parent.clone(),
                        red.left.clone().into(),
                    )),
                    red.element.clone(),
                    BlackNode::Black(Grown::Red(grandchild).blacken()),
                )),
                Grown::Black(grandchild) => wrap(RedBranch::shared(
                    red.left.clone(),
                    red.element.clone(),
                    BlackNode::Black(grandchild),
                )),
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
