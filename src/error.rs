use std::num::ParseIntError;

use thiserror::Error as ThisError;

use crate::values::Key;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A broken tree invariant, as reported by
/// [`KAvlTree::validate`](crate::collections::KAvlTree::validate).
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TreeError {
    #[error("key {after} is visited after {before} in order")]
    Unordered { before: Key, after: Key },

    #[error("node {key} has child heights {left} and {right}, tolerance is {tolerance}")]
    Imbalanced {
        key: Key,
        left: i32,
        right: i32,
        tolerance: u32,
    },

    #[error("node {key} stores height {stored}, expected {computed}")]
    StaleHeight { key: Key, stored: i32, computed: i32 },

    #[error("tree counts {counted} keys but tracks {tracked}")]
    LengthMismatch { counted: usize, tracked: usize },
}

#[derive(Debug, ThisError, PartialEq, Clone)]
pub enum Error {
    #[error("invalid configuration: k must be a non-negative 32-bit integer, got {k}")]
    InvalidConfiguration { k: i64 },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("failed to deserialize: {0}")]
    FailedDeserialization(String),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

impl From<ParseIntError> for Error {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn from(error: ParseIntError) -> Self {
        Error::FailedDeserialization(format!("{}", error))
    }
}
