//! Errors raised while building or committing a tree.

use thiserror::Error;
use wbt_core::base::{CompositeKey, RecordError};
use wbt_core::schema::report::SampleOrigin;

/// Errors that can occur when building, flattening, committing or sampling
/// a tree.
///
/// All of them are contract violations: the computation is deterministic, so
/// nothing here is worth retrying.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The record sequence itself is malformed or unsorted.
    #[error(transparent)]
    Records(#[from] RecordError),

    /// A key is both a leaf and the prefix of a nested scope.
    #[error("Key {key} holds a value and also owns a nested scope")]
    KeyConflict {
        /// The conflicting composite key.
        key: CompositeKey,
    },

    /// Sibling keys within one scope are not ascending.
    #[error("Sibling key {key} sorts before its predecessor {previous}")]
    SiblingsOutOfOrder {
        /// Composite key of the preceding sibling.
        previous: CompositeKey,
        /// Composite key of the offending sibling.
        key: CompositeKey,
    },

    /// A node id does not belong to the forest.
    #[error("Unknown node id {0}")]
    UnknownNode(usize),

    /// A flattened sequence is not in ascending path order.
    #[error("Node {index} at path '{path}' does not sort after '{previous}'")]
    UnsortedPaths {
        /// Index of the offending node.
        index: usize,
        /// Path of the preceding node.
        previous: String,
        /// Path of the offending node.
        path: String,
    },

    /// A node was reached after the subtree it belongs to had been closed.
    #[error("Node {index} at path '{path}' is out of order under subtree '{expected}'")]
    PathOutOfOrder {
        /// Index of the offending node.
        index: usize,
        /// Path of the offending node.
        path: String,
        /// Path prefix of the subtree being consumed.
        expected: String,
    },

    /// A non-empty subtree has no node at its pivot position.
    #[error("Subtree '{subtree}' has no pivot node at index {index}")]
    MissingPivot {
        /// Path prefix of the subtree.
        subtree: String,
        /// Cursor position where the pivot was expected.
        index: usize,
    },

    /// A node's variant contradicts its path.
    #[error("Node at path '{path}' must be a {expected}")]
    KindMismatch {
        /// Path of the offending node.
        path: String,
        /// The variant the path requires.
        expected: &'static str,
    },

    /// Nodes remained after the outermost subtree was consumed.
    #[error("{remaining} nodes left unconsumed after computing the root hash, first at path '{path}'")]
    Leftover {
        /// Number of unconsumed nodes.
        remaining: usize,
        /// Path of the first unconsumed node.
        path: String,
    },

    /// More samples were requested than there are leaves.
    #[error("Requested {requested} {origin:?} samples but only {available} leaves exist")]
    InsufficientLeaves {
        /// Which kind of sample was requested.
        origin: SampleOrigin,
        /// Number of samples requested.
        requested: usize,
        /// Number of leaves in the tree.
        available: usize,
    },
}
