#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod point;
mod queue;
mod r#type;

pub use error::{KdIndexError, Result};
pub use kdtree::{KdTree, KdTreeIndex};
pub use point::Point;
pub use queue::BoundedCandidateQueue;
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
