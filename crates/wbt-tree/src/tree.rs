//! One-call construction of a committed tree.

use rand::Rng;
use tracing::debug;
use wbt_core::base::{Felt, SortedRecords};

use crate::commit::Commitment;
use crate::error::TreeError;
use crate::flat::Flattened;
use crate::group::ScopeForest;
use crate::node::{Combine, PedersenCombiner};
use crate::sample::{ReadSample, select_reads};
use crate::shape::ShapedForest;

/// A shaped, flattened and committed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightBalancedTree {
    shaped: ShapedForest,
    flat: Flattened,
    commitment: Commitment,
}

impl WeightBalancedTree {
    /// Build and commit with the Pedersen combiner.
    pub fn build(records: &SortedRecords) -> Result<Self, TreeError> {
        Self::build_with(records, &PedersenCombiner)
    }

    /// Build and commit with an arbitrary combiner.
    pub fn build_with<C: Combine>(records: &SortedRecords, combiner: &C) -> Result<Self, TreeError> {
        let forest = ScopeForest::group(records)?;
        debug!(
            records = records.len(),
            nodes = forest.len(),
            scopes = forest.scope_count(),
            "Grouped records"
        );

        let shaped = ShapedForest::assign(forest)?;
        let flat = shaped.flatten()?;
        let commitment = flat.commit(combiner)?;
        debug!(root = %commitment.root(), "Committed tree");

        Ok(Self {
            shaped,
            flat,
            commitment,
        })
    }

    /// The root hash.
    #[must_use]
    pub const fn root(&self) -> Felt {
        self.commitment.root()
    }

    /// The shaped forest.
    #[must_use]
    pub const fn shaped(&self) -> &ShapedForest {
        &self.shaped
    }

    /// The path-ordered node sequence.
    #[must_use]
    pub const fn flattened(&self) -> &Flattened {
        &self.flat
    }

    /// The commitment with per-node digests.
    #[must_use]
    pub const fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Select proof samples from this tree's leaves. See [`select_reads`].
    pub fn select_reads<R: Rng + ?Sized>(
        &self,
        exist_amount: usize,
        miss_amount: usize,
        rng: &mut R,
    ) -> Result<Vec<ReadSample>, TreeError> {
        select_reads(&self.flat, exist_amount, miss_amount, rng)
    }
}

#[cfg(test)]
mod tests {
    use test_utils::records;

    use super::*;

    #[test]
    fn build_runs_the_pipeline() {
        let records = records![[0, 3, 10] => 1, [0, 3, 20] => 2, [1] => 9];
        let tree = WeightBalancedTree::build(&records).expect("build");

        assert_eq!(tree.shaped().forest().record_count(), 3);
        assert_eq!(tree.flattened().len(), 5);
        assert_eq!(tree.commitment().digests().len(), 5);
        assert_eq!(
            tree.flattened().regroup().expect("regroup"),
            tree.shaped().forest().entries().expect("entries")
        );
        assert!(!tree.root().is_zero());
    }

    #[test]
    fn combiner_is_pluggable() {
        let records = records![[1] => 2];
        let xor = |lhs: &Felt, rhs: &Felt| {
            let mut bytes = lhs.to_bytes();
            for (out, byte) in bytes.iter_mut().zip(rhs.as_ref()) {
                *out ^= byte;
            }
            Felt::new(bytes)
        };
        let tree = WeightBalancedTree::build_with(&records, &xor).expect("build");
        // (0 ^ 1) ^ (2 ^ 0)
        assert_eq!(tree.root(), Felt::from(3));
    }

    #[test]
    fn conflicting_records_are_rejected() {
        let records = records![[0] => 1, [0, 1] => 2];
        assert!(matches!(
            WeightBalancedTree::build(&records),
            Err(TreeError::KeyConflict { .. })
        ));
    }
}
