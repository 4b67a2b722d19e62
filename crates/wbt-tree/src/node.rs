//! Hash combination for tree nodes.
//!
//! Committing a tree only ever needs one primitive: fold two field elements
//! into one. [`PedersenCombiner`] implements it with the Sapling Pedersen
//! Merkle hash so the commitment stays ZK friendly; any
//! `Fn(&Felt, &Felt) -> Felt` closure can stand in for it.

use sapling::merkle_hash;
use wbt_core::base::Felt;

/// Personalization level used for every combination.
///
/// Node roles are encoded by argument order, not by level. Sapling Pedersen
/// hashing requires level < 63.
const COMBINE_LEVEL: usize = 62;

/// A binary combination `Felt × Felt -> Felt`.
///
/// Implementations must be deterministic. [`Felt::ZERO`] stands for an empty
/// subtree and is fed to the combiner like any other value.
pub trait Combine {
    /// Combine `lhs` and `rhs` into a single field element.
    fn combine(&self, lhs: &Felt, rhs: &Felt) -> Felt;
}

impl<F> Combine for F
where
    F: Fn(&Felt, &Felt) -> Felt,
{
    fn combine(&self, lhs: &Felt, rhs: &Felt) -> Felt {
        self(lhs, rhs)
    }
}

/// Sapling Pedersen Merkle hash combiner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PedersenCombiner;

impl Combine for PedersenCombiner {
    fn combine(&self, lhs: &Felt, rhs: &Felt) -> Felt {
        Felt::new(merkle_hash(COMBINE_LEVEL, lhs.as_ref(), rhs.as_ref()))
    }
}
