//! Utilities to traverse the KdTree structure.

use std::fmt;

use crate::kdtree::index::TreeNode;
use crate::point::Point;
use crate::r#type::IndexableNum;

/// A node in the KdTree.
///
/// This is a cheap, copyable reference onto a single entry of the tree. Use
/// [`left_child`][Self::left_child] and [`right_child`][Self::right_child] to walk the
/// tree manually.
pub struct Node<'a, T, const D: usize, N: IndexableNum> {
    /// The node arena of the tree this node is a reference onto
    pub(crate) nodes: &'a [TreeNode<T, D, N>],

    /// Position of this node in the arena
    pub(crate) index: usize,
}

impl<'a, T, const D: usize, N: IndexableNum> Node<'a, T, D, N> {
    pub(crate) fn new(nodes: &'a [TreeNode<T, D, N>], index: usize) -> Self {
        debug_assert!(index < nodes.len());
        Self { nodes, index }
    }

    #[inline]
    fn entry(&self) -> &'a TreeNode<T, D, N> {
        &self.nodes[self.index]
    }

    /// The point this node is keyed on.
    #[inline]
    pub fn key(&self) -> &'a Point<N, D> {
        &self.entry().key
    }

    /// The value associated with this node's point.
    #[inline]
    pub fn value(&self) -> &'a T {
        &self.entry().value
    }

    /// The number of edges between the root and this node.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entry().depth
    }

    /// The axis the children of this node are split over.
    #[inline]
    pub fn axis(&self) -> usize {
        self.entry().axis()
    }

    /// The child holding points whose coordinate on [`axis`][Self::axis] is strictly less
    /// than this node's.
    pub fn left_child(&self) -> Option<Node<'a, T, D, N>> {
        self.entry().left.map(|index| Node::new(self.nodes, index))
    }

    /// The child holding points whose coordinate on [`axis`][Self::axis] is greater than
    /// or equal to this node's.
    pub fn right_child(&self) -> Option<Node<'a, T, D, N>> {
        self.entry().right.map(|index| Node::new(self.nodes, index))
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        let entry = self.entry();
        entry.left.is_none() && entry.right.is_none()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// The children on the same side of the splitting hyperplane as `point` and on the
    /// opposite side, in that order.
    #[inline]
    pub(crate) fn near_far(
        &self,
        point: &Point<N, D>,
    ) -> (Option<Node<'a, T, D, N>>, Option<Node<'a, T, D, N>>) {
        if self.entry().goes_left(point) {
            (self.left_child(), self.right_child())
        } else {
            (self.right_child(), self.left_child())
        }
    }
}

// Manual impls so that `T` is not required to be `Clone` or `Copy`
impl<T, const D: usize, N: IndexableNum> Clone for Node<'_, T, D, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const D: usize, N: IndexableNum> Copy for Node<'_, T, D, N> {}

impl<T: fmt::Debug, const D: usize, N: IndexableNum> fmt::Debug for Node<'_, T, D, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("value", self.value())
            .field("depth", &self.depth())
            .finish()
    }
}
