use std::mem;

use geo_traits::CoordTrait;
use log::{debug, trace};

use crate::error::{KdIndexError, Result};
use crate::kdtree::r#trait::KdTreeIndex;
use crate::kdtree::traversal::Node;
use crate::point::Point;
use crate::r#type::IndexableNum;

/// A single entry of the tree.
#[derive(Debug, Clone)]
pub(crate) struct TreeNode<T, const D: usize, N: IndexableNum> {
    pub(crate) key: Point<N, D>,
    pub(crate) value: T,
    pub(crate) depth: usize,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<T, const D: usize, N: IndexableNum> TreeNode<T, D, N> {
    fn new(key: Point<N, D>, value: T, depth: usize) -> Self {
        Self {
            key,
            value,
            depth,
            left: None,
            right: None,
        }
    }

    /// The splitting dimension of this node
    #[inline]
    pub(crate) fn axis(&self) -> usize {
        self.depth % D
    }

    /// Whether `point` belongs in the left subtree of this node.
    #[inline]
    pub(crate) fn goes_left(&self, point: &Point<N, D>) -> bool {
        let axis = self.axis();
        point[axis] < self.key[axis]
    }
}

/// An owned, incrementally-built K-D tree mapping `D`-dimensional points to values of type
/// `T`.
///
/// The tree is not rebalanced: its shape is entirely determined by insertion order. Nodes are
/// stored in a flat arena and the root, when present, is always the first entry.
///
/// ```
/// use kd_index::{KdTree, KdTreeIndex, Point};
///
/// let mut tree = KdTree::<&str, 2>::new();
/// tree.insert(Point::new([0., 0.]), "a").unwrap();
/// tree.insert(Point::new([2., 0.]), "b").unwrap();
/// tree.insert(Point::new([0., 2.]), "c").unwrap();
///
/// assert_eq!(tree.nearest_neighbor(&Point::new([1.8, 0.1])).unwrap(), &"b");
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<T, const D: usize, N: IndexableNum = f64> {
    pub(crate) nodes: Vec<TreeNode<T, D, N>>,
    max_depth: usize,
}

impl<T, const D: usize, N: IndexableNum> KdTree<T, D, N> {
    const NONZERO_DIMENSION: () = assert!(D > 0, "A KdTree needs at least one dimension");

    /// Create a new, empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new, empty tree with space reserved for `capacity` points.
    pub fn with_capacity(capacity: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO_DIMENSION;
        Self {
            nodes: Vec::with_capacity(capacity),
            max_depth: 0,
        }
    }

    /// Create a tree by inserting each point with the value at the same position.
    ///
    /// Returns [`KdIndexError::InvalidArgument`] if `points` and `values` do not have the same
    /// length, or if any point has a non-finite coordinate.
    pub fn try_from_pairs(
        points: impl IntoIterator<Item = Point<N, D>>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self> {
        let mut points = points.into_iter();
        let mut values = values.into_iter();
        let mut tree = Self::with_capacity(points.size_hint().0);

        loop {
            match (points.next(), values.next()) {
                (Some(point), Some(value)) => {
                    tree.insert(point, value)?;
                }
                (None, None) => break,
                _ => {
                    return Err(KdIndexError::InvalidArgument(
                        "Number of points does not match number of values.".to_string(),
                    ))
                }
            }
        }

        debug!(
            "Built KdTree with {} points and max depth {}",
            tree.len(),
            tree.max_depth()
        );
        Ok(tree)
    }

    /// Insert each `(point, value)` pair in iteration order, stopping at the first error.
    ///
    /// Pairs inserted before the error remain in the tree.
    pub fn try_extend(&mut self, pairs: impl IntoIterator<Item = (Point<N, D>, T)>) -> Result<()> {
        let before = self.len();
        for (point, value) in pairs {
            self.insert(point, value)?;
        }
        debug!("Extended KdTree from {} to {} points", before, self.len());
        Ok(())
    }

    /// Insert a point with its associated value.
    ///
    /// If the tree already holds a point equal to `point`, its value is replaced and the old
    /// value returned. Otherwise the point is added as a new leaf and `None` is returned.
    ///
    /// Returns [`KdIndexError::InvalidArgument`] if any coordinate is NaN or infinite.
    pub fn insert(&mut self, point: Point<N, D>, value: T) -> Result<Option<T>> {
        if !point.is_finite() {
            return Err(KdIndexError::InvalidArgument(format!(
                "Cannot insert point with non-finite coordinates {:?}.",
                point.coords()
            )));
        }

        // (parent index, whether the new node hangs to its left)
        let mut parent: Option<(usize, bool)> = None;
        let mut current = if self.nodes.is_empty() { None } else { Some(0) };
        let mut depth = 0;

        while let Some(index) = current {
            let node = &mut self.nodes[index];
            if node.key == point {
                trace!("Replaced value at depth {}", node.depth);
                return Ok(Some(mem::replace(&mut node.value, value)));
            }

            let left = node.goes_left(&point);
            current = if left { node.left } else { node.right };
            parent = Some((index, left));
            depth += 1;
        }

        let new_index = self.nodes.len();
        self.nodes.push(TreeNode::new(point, value, depth));
        self.max_depth = self.max_depth.max(depth);
        if let Some((index, left)) = parent {
            let node = &mut self.nodes[index];
            if left {
                node.left = Some(new_index);
            } else {
                node.right = Some(new_index);
            }
        }
        trace!("Inserted node {} at depth {}", new_index, depth);

        Ok(None)
    }

    /// Insert a point given as any [`CoordTrait`] implementation.
    ///
    /// Returns [`KdIndexError::DimensionMismatch`] if the coord does not have `D` dimensions.
    pub fn insert_coord(&mut self, coord: &impl CoordTrait<T = N>, value: T) -> Result<Option<T>> {
        self.insert(Point::try_from_coord(coord)?, value)
    }

    /// The number of distinct points in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if this tree holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of coordinates of each point in this tree.
    #[inline]
    pub fn dimension(&self) -> usize {
        D
    }

    /// The largest node depth in this tree, `0` when empty.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<T, const D: usize, N: IndexableNum> Default for KdTree<T, D, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const D: usize, N: IndexableNum> KdTreeIndex<T, D, N> for KdTree<T, D, N> {
    fn root(&self) -> Option<Node<'_, T, D, N>> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(Node::new(&self.nodes, 0))
        }
    }
}
