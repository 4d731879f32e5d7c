use geo_traits::CoordTrait;
use log::debug;
use tinyvec::TinyVec;

use crate::error::{KdIndexError, Result};
use crate::kdtree::traversal::Node;
use crate::point::Point;
use crate::queue::BoundedCandidateQueue;
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a KdTree.
pub trait KdTreeIndex<T, const D: usize, N: IndexableNum>: Sized {
    /// Access the root node of the tree for manual traversal, `None` if the tree is empty.
    fn root(&self) -> Option<Node<'_, T, D, N>>;

    /// Find the node whose key equals `point`.
    fn find(&self, point: &Point<N, D>) -> Option<Node<'_, T, D, N>> {
        let mut current = self.root();
        while let Some(node) = current {
            if node.key() == point {
                return Some(node);
            }
            current = node.near_far(point).0;
        }
        None
    }

    /// Returns `true` if the tree holds a point equal to `point`.
    fn contains(&self, point: &Point<N, D>) -> bool {
        self.find(point).is_some()
    }

    /// The value associated with the point equal to `point`, if any.
    fn get(&self, point: &Point<N, D>) -> Option<&T> {
        self.find(point).map(|node| node.value())
    }

    /// The value of the point closest to `point`.
    ///
    /// Returns [`KdIndexError::EmptyResult`] if the tree is empty.
    fn nearest_neighbor(&self, point: &Point<N, D>) -> Result<&T> {
        check_query_point(point)?;
        let root = self.root().ok_or_else(|| {
            KdIndexError::EmptyResult("Nearest neighbor query on an empty tree.".to_string())
        })?;

        let mut queue = BoundedCandidateQueue::new(1)?;
        search_nearest(root, point, &mut queue);
        Ok(queue.dequeue_min()?.value())
    }

    /// The value of the point closest to the given coordinate.
    fn nearest_neighbor_coord(&self, coord: &impl CoordTrait<T = N>) -> Result<&T> {
        self.nearest_neighbor(&Point::try_from_coord(coord)?)
    }

    /// The values of the `k` points closest to `point`, ordered from nearest to farthest.
    ///
    /// Returns fewer than `k` values only if the tree holds fewer than `k` points.
    ///
    /// ```
    /// use kd_index::{KdTree, KdTreeIndex, Point};
    ///
    /// let tree = KdTree::<u32, 1>::try_from_pairs(
    ///     [[0.], [10.], [4.], [7.]].map(Point::new),
    ///     [0, 10, 4, 7],
    /// )
    /// .unwrap();
    ///
    /// let results = tree.k_nearest_neighbors(&Point::new([6.]), 3).unwrap();
    /// assert_eq!(results, vec![&7, &4, &10]);
    /// ```
    fn k_nearest_neighbors(&self, point: &Point<N, D>, k: usize) -> Result<Vec<&T>> {
        let results = self.k_nearest_neighbors_with_distance(point, k)?;
        Ok(results.into_iter().map(|(value, _)| value).collect())
    }

    /// The values of the `k` points closest to `point` along with their distance to `point`,
    /// ordered from nearest to farthest.
    fn k_nearest_neighbors_with_distance(
        &self,
        point: &Point<N, D>,
        k: usize,
    ) -> Result<Vec<(&T, N)>> {
        check_query_point(point)?;
        let root = match self.root() {
            Some(root) if k > 0 => root,
            _ => return Ok(vec![]),
        };

        let mut queue = BoundedCandidateQueue::new(k)?;
        search_nearest(root, point, &mut queue);
        Ok(queue
            .into_sorted_vec()
            .into_iter()
            .map(|(node, dist)| (node.value(), dist))
            .collect())
    }

    /// The values of the `k` points closest to the given coordinate.
    fn k_nearest_neighbors_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        k: usize,
    ) -> Result<Vec<&T>> {
        self.k_nearest_neighbors(&Point::try_from_coord(coord)?, k)
    }

    /// Search along the single descent path of `point` for items within `radius`.
    ///
    /// Each node on the path from the root towards where `point` would be inserted is tested
    /// against `radius` (inclusive). Subtrees off that path are never visited, so points
    /// within `radius` that lie across a splitting hyperplane from `point` may be missed. Use
    /// [`within`][Self::within] for a complete search.
    ///
    /// Returns values in visit order.
    fn range_query(&self, point: &Point<N, D>, radius: N) -> Result<Vec<&T>> {
        check_query_point(point)?;
        check_radius(radius)?;

        let mut result = vec![];
        let mut current = self.root();
        while let Some(node) = current {
            if node.key().distance(point) <= radius {
                result.push(node.value());
            }
            current = node.near_far(point).0;
        }
        Ok(result)
    }

    /// Search the tree for every item within `radius` (inclusive) of `point`.
    ///
    /// Both children of a node are searched whenever its splitting hyperplane lies within
    /// `radius` of `point`. Returns values in visit order, which is not sorted by distance.
    fn within(&self, point: &Point<N, D>, radius: N) -> Result<Vec<&T>> {
        check_query_point(point)?;
        check_radius(radius)?;

        let root = match self.root() {
            Some(root) => root,
            None => return Ok(vec![]),
        };

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[usize; 32]> = TinyVec::new();
        stack.push(root.index);

        let mut result = vec![];
        while let Some(index) = stack.pop() {
            let node = Node::new(root.nodes, index);
            if node.key().distance(point) <= radius {
                result.push(node.value());
            }

            let (near, far) = node.near_far(point);
            // Note: far is pushed first so that the near side is searched first
            if let Some(far) = far {
                if point.axis_distance(node.key(), node.axis()) <= radius {
                    stack.push(far.index);
                }
            }
            if let Some(near) = near {
                stack.push(near.index);
            }
        }
        Ok(result)
    }

    /// Search the tree for every item within `radius` of the given coordinate.
    fn within_coord(&self, coord: &impl CoordTrait<T = N>, radius: N) -> Result<Vec<&T>> {
        self.within(&Point::try_from_coord(coord)?, radius)
    }
}

/// A pending step of the nearest neighbor search.
enum Step<'a, T, const D: usize, N: IndexableNum> {
    /// Offer this node to the queue, then search its children
    Visit(Node<'a, T, D, N>),
    /// Search the far child of a node once its near side is exhausted, if the splitting
    /// hyperplane is still closer than the worst retained candidate
    Far {
        node: Node<'a, T, D, N>,
        plane_dist: N,
    },
}

/// Fill `queue` with the nodes closest to `point`, searching near children before far ones
/// and skipping far subtrees that cannot hold a closer point than the worst candidate.
pub(crate) fn search_nearest<'a, T, const D: usize, N: IndexableNum>(
    root: Node<'a, T, D, N>,
    point: &Point<N, D>,
    queue: &mut BoundedCandidateQueue<Node<'a, T, D, N>, N>,
) {
    let mut stack = vec![Step::Visit(root)];
    let mut visited = 0usize;

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(node) => {
                visited += 1;
                queue.enqueue(node, node.key().distance(point));

                let (near, far) = node.near_far(point);
                if let Some(far) = far {
                    stack.push(Step::Far {
                        node: far,
                        plane_dist: point.axis_distance(node.key(), node.axis()),
                    });
                }
                if let Some(near) = near {
                    stack.push(Step::Visit(near));
                }
            }
            Step::Far { node, plane_dist } => {
                let worth_visiting =
                    !queue.is_full() || queue.worst().map_or(true, |worst| plane_dist < worst);
                if worth_visiting {
                    stack.push(Step::Visit(node));
                }
            }
        }
    }

    debug!(
        "Nearest search for {} candidates visited {} of {} nodes",
        queue.max_size(),
        visited,
        root.nodes.len()
    );
}

fn check_query_point<const D: usize, N: IndexableNum>(point: &Point<N, D>) -> Result<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(KdIndexError::InvalidArgument(format!(
            "Query point has non-finite coordinates {:?}.",
            point.coords()
        )))
    }
}

fn check_radius<N: IndexableNum>(radius: N) -> Result<()> {
    if radius.is_finite() && radius >= N::zero() {
        Ok(())
    } else {
        Err(KdIndexError::InvalidArgument(format!(
            "Radius must be finite and non-negative, got {:?}.",
            radius
        )))
    }
}
