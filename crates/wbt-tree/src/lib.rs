//! Canonical weight-balanced commitment trees.
//!
//! Records sorted by composite key are grouped into nested sibling lists,
//! every list is shaped into the unique size-balanced binary tree for its
//! length, and the shaped forest is committed to a single root hash:
//!
//! 1. [`ScopeForest::group`] builds the nested scopes.
//! 2. [`ShapedForest::assign`] picks pivots and links every node.
//! 3. [`ShapedForest::flatten`] produces the path-ordered node sequence.
//! 4. [`Flattened::commit`] folds that sequence into a [`Commitment`].
//!
//! [`WeightBalancedTree`] runs the whole pipeline; [`select_reads`] draws
//! composite keys for exercising inclusion and exclusion proofs.

mod commit;
mod error;
mod flat;
mod group;
mod node;
mod path;
mod sample;
mod shape;
mod tree;

pub use commit::{Commitment, NodeDigest, commit_nodes};
pub use error::TreeError;
pub use flat::{FlatBody, FlatNode, Flattened, regroup_nodes};
pub use group::{NodeBody, NodeId, ScopeEntry, ScopeForest, ScopeNode};
pub use node::{Combine, PedersenCombiner};
pub use path::{Path, Step};
pub use sample::{ReadSample, select_reads};
pub use shape::{FlatIter, Links, ShapedForest, pivot};
pub use tree::WeightBalancedTree;
