//! An implementation of an incrementally-built, N-dimensional K-D Tree.

#![warn(missing_docs)]

mod index;
mod r#trait;
mod traversal;

pub use index::KdTree;
pub use r#trait::KdTreeIndex;
pub use traversal::Node;
