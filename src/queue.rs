//! A fixed-capacity priority queue retaining the `k` closest candidates seen so far.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{KdIndexError, Result};
use crate::r#type::IndexableNum;

/// A best-`k` container keyed by distance.
///
/// Holds at most [`max_size`][Self::max_size] items. Once full, a new item is only retained
/// if it is strictly closer than the current worst item, which is then evicted. On equal
/// distance the item already in the queue wins.
///
/// ```
/// use kd_index::BoundedCandidateQueue;
///
/// let mut queue = BoundedCandidateQueue::new(2).unwrap();
/// queue.enqueue("x", 5.);
/// queue.enqueue("y", 3.);
/// queue.enqueue("z", 4.);
///
/// assert_eq!(queue.worst().unwrap(), 4.);
/// assert_eq!(queue.dequeue_min().unwrap(), "y");
/// assert_eq!(queue.dequeue_min().unwrap(), "z");
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BoundedCandidateQueue<T, N: IndexableNum> {
    max_size: usize,
    items: BTreeSet<Candidate<T, N>>,
    /// Insertion counter, used to order candidates of equal distance
    next_seq: u64,
}

impl<T, N: IndexableNum> BoundedCandidateQueue<T, N> {
    /// Create a new, empty queue retaining at most `max_size` items.
    ///
    /// Returns [`KdIndexError::InvalidArgument`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(KdIndexError::InvalidArgument(
                "Queue capacity must be at least 1.".to_string(),
            ));
        }

        Ok(Self {
            max_size,
            items: BTreeSet::new(),
            next_seq: 0,
        })
    }

    /// Offer an item with its distance to the queue.
    ///
    /// NaN distances are never retained.
    pub fn enqueue(&mut self, item: T, distance: N) {
        if distance.is_nan() {
            return;
        }

        if self.is_full() {
            match self.items.last() {
                Some(worst) if distance < worst.dist => {
                    self.items.pop_last();
                }
                _ => return,
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.insert(Candidate {
            dist: distance,
            seq,
            item,
        });
    }

    /// Remove and return the item with the smallest distance.
    pub fn dequeue_min(&mut self) -> Result<T> {
        self.items
            .pop_first()
            .map(|candidate| candidate.item)
            .ok_or_else(|| KdIndexError::EmptyResult("Dequeue from an empty queue.".to_string()))
    }

    /// The largest distance currently retained.
    pub fn worst(&self) -> Result<N> {
        self.items
            .last()
            .map(|candidate| candidate.dist)
            .ok_or_else(|| {
                KdIndexError::EmptyResult("No worst distance in an empty queue.".to_string())
            })
    }

    /// The number of items currently retained.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The fixed capacity of this queue.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns `true` if no items are retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` once [`max_size`][Self::max_size] items are retained.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_size
    }

    /// Consume the queue, returning items with their distances from nearest to farthest.
    pub fn into_sorted_vec(self) -> Vec<(T, N)> {
        self.items
            .into_iter()
            .map(|candidate| (candidate.item, candidate.dist))
            .collect()
    }
}

/// An item and its distance, ordered by distance and then by insertion order.
#[derive(Debug, Clone)]
struct Candidate<T, N: IndexableNum> {
    dist: N,
    seq: u64,
    item: T,
}

impl<T, N: IndexableNum> PartialEq for Candidate<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, N: IndexableNum> Eq for Candidate<T, N> {}

impl<T, N: IndexableNum> Ord for Candidate<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN is never enqueued
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T, N: IndexableNum> PartialOrd for Candidate<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use crate::error::KdIndexError;
    use crate::queue::BoundedCandidateQueue;

    #[test]
    fn rejects_zero_capacity() {
        let err = BoundedCandidateQueue::<(), f64>::new(0).unwrap_err();
        assert!(matches!(err, KdIndexError::InvalidArgument(_)));
    }

    #[test]
    fn retains_best_k() {
        let mut queue = BoundedCandidateQueue::new(2).unwrap();
        queue.enqueue('x', 5.);
        queue.enqueue('y', 3.);
        queue.enqueue('z', 4.);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.max_size(), 2);
        assert_eq!(queue.worst().unwrap(), 4.);
        assert_eq!(queue.dequeue_min().unwrap(), 'y');
        assert_eq!(queue.dequeue_min().unwrap(), 'z');
        assert!(queue.dequeue_min().is_err());
    }

    #[test]
    fn fills_before_evicting() {
        let mut queue = BoundedCandidateQueue::new(3).unwrap();
        queue.enqueue(1, 10.);
        assert!(!queue.is_full());
        assert_eq!(queue.worst().unwrap(), 10.);
        queue.enqueue(2, 20.);
        queue.enqueue(3, 30.);
        assert!(queue.is_full());

        // worse than everything retained, dropped
        queue.enqueue(4, 40.);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.worst().unwrap(), 30.);

        queue.enqueue(5, 0.5);
        assert_eq!(
            queue.into_sorted_vec(),
            vec![(5, 0.5), (1, 10.), (2, 20.)]
        );
    }

    #[test]
    fn ties_keep_existing() {
        let mut queue = BoundedCandidateQueue::new(1).unwrap();
        queue.enqueue("first", 2.);
        queue.enqueue("second", 2.);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue_min().unwrap(), "first");
    }

    #[test]
    fn equal_distances_dequeue_in_insertion_order() {
        let mut queue = BoundedCandidateQueue::new(4).unwrap();
        queue.enqueue("a", 1.);
        queue.enqueue("b", 1.);
        queue.enqueue("c", 0.);
        assert_eq!(queue.dequeue_min().unwrap(), "c");
        assert_eq!(queue.dequeue_min().unwrap(), "a");
        assert_eq!(queue.dequeue_min().unwrap(), "b");
    }

    #[test]
    fn empty_queue_errors() {
        let mut queue = BoundedCandidateQueue::<u8, f32>::new(1).unwrap();
        assert!(queue.is_empty());
        assert!(matches!(
            queue.worst().unwrap_err(),
            KdIndexError::EmptyResult(_)
        ));
        assert!(matches!(
            queue.dequeue_min().unwrap_err(),
            KdIndexError::EmptyResult(_)
        ));
    }

    #[test]
    fn ignores_nan() {
        let mut queue = BoundedCandidateQueue::new(2).unwrap();
        queue.enqueue(1, f64::NAN);
        assert!(queue.is_empty());
    }
}
