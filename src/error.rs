use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdIndexError {
    /// An argument was outside of the domain the operation accepts, such as a zero queue
    /// capacity, a non-finite coordinate or a negative radius.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation needs at least one element but the structure was empty.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// A coordinate input did not have the dimensionality of the index.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index
        expected: usize,
        /// Dimensionality of the input
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
