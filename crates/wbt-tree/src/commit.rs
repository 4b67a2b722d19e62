//! Root-hash computation over a flattened tree.
//!
//! With `c` the combiner, `k` a node's key and `v` a leaf's value:
//!
//! - empty subtree: [`Felt::ZERO`]
//! - leaf: `c(c(left, k), c(v, right))`
//! - scope root: `c(c(left, k), c(nested, right))`

use wbt_core::base::{CompositeKey, Felt};

use crate::error::TreeError;
use crate::flat::{FlatNode, ScopeVisitor, walk};
use crate::node::Combine;
use crate::path::Path;

/// Hash of one node, with what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDigest {
    /// Structural path.
    pub path: Path,
    /// Number of enclosing scopes.
    pub nesting: usize,
    /// Full composite key.
    pub composite: CompositeKey,
    /// Stored value, for leaves.
    pub value: Option<u64>,
    /// Hash of the subtree rooted at this node.
    pub hash: Felt,
    /// Root hash of the nested scope, for scope roots.
    pub nested_root: Option<Felt>,
}

/// Root hash of a tree together with every node's digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    root: Felt,
    digests: Vec<NodeDigest>,
}

impl Commitment {
    /// The root hash.
    #[must_use]
    pub const fn root(&self) -> Felt {
        self.root
    }

    /// Node digests in path order.
    #[must_use]
    pub fn digests(&self) -> &[NodeDigest] {
        &self.digests
    }

    /// Consume into the node digests.
    #[must_use]
    pub fn into_digests(self) -> Vec<NodeDigest> {
        self.digests
    }

    /// Nested-scope root hash of the scope identified by `composite`.
    #[must_use]
    pub fn scope_root(&self, composite: &CompositeKey) -> Option<Felt> {
        self.digests
            .iter()
            .find(|digest| digest.nested_root.is_some() && digest.composite == *composite)
            .and_then(|digest| digest.nested_root)
    }
}

/// Commit to a path-ordered node slice.
///
/// Every node is consumed exactly once; a node that does not fit the shape
/// implied by the nodes before it is fatal.
pub fn commit_nodes<C: Combine>(
    nodes: &[FlatNode],
    combiner: &C,
) -> Result<Commitment, TreeError> {
    let mut hasher = Hasher {
        combiner,
        digests: Vec::with_capacity(nodes.len()),
    };
    let root = walk(nodes, &mut hasher)?;
    let mut digests = hasher.digests;
    // Digests are produced bottom-up.
    digests.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(Commitment { root, digests })
}

struct Hasher<'c, C> {
    combiner: &'c C,
    digests: Vec<NodeDigest>,
}

impl<C: Combine> Hasher<'_, C> {
    fn record(&mut self, node: &FlatNode, hash: Felt, nested_root: Option<Felt>) -> Felt {
        self.digests.push(NodeDigest {
            path: node.path.clone(),
            nesting: node.nesting,
            composite: node.composite.clone(),
            value: node.value(),
            hash,
            nested_root,
        });
        hash
    }
}

impl<C: Combine> ScopeVisitor for Hasher<'_, C> {
    type Output = Felt;

    fn empty(&mut self) -> Felt {
        Felt::ZERO
    }

    fn leaf(&mut self, node: &FlatNode, value: u64, left: Felt, right: Felt) -> Felt {
        let left_combined = self.combiner.combine(&left, &Felt::from(node.key));
        let right_combined = self.combiner.combine(&Felt::from(value), &right);
        let hash = self.combiner.combine(&left_combined, &right_combined);
        self.record(node, hash, None)
    }

    fn scope_root(&mut self, node: &FlatNode, left: Felt, nested: Felt, right: Felt) -> Felt {
        let left_combined = self.combiner.combine(&left, &Felt::from(node.key));
        let right_combined = self.combiner.combine(&nested, &right);
        let hash = self.combiner.combine(&left_combined, &right_combined);
        self.record(node, hash, Some(nested))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "Test code")]

    use test_utils::{key, records};
    use wbt_core::base::SortedRecords;

    use super::*;
    use crate::group::ScopeForest;
    use crate::node::PedersenCombiner;
    use crate::shape::ShapedForest;

    fn commit<C: Combine>(records: &SortedRecords, combiner: &C) -> Commitment {
        let forest = ScopeForest::group(records).expect("group");
        let shaped = ShapedForest::assign(forest).expect("assign");
        shaped
            .flatten()
            .expect("flatten")
            .commit(combiner)
            .expect("commit")
    }

    fn combine(lhs: &Felt, rhs: &Felt) -> Felt {
        PedersenCombiner.combine(lhs, rhs)
    }

    fn felt(value: u64) -> Felt {
        Felt::from(value)
    }

    #[test]
    fn empty_tree_is_zero() {
        let commitment = commit(&records![], &PedersenCombiner);
        assert_eq!(commitment.root(), Felt::ZERO);
        assert!(commitment.digests().is_empty());
    }

    #[test]
    fn single_leaf() {
        let commitment = commit(&records![[5] => 7], &PedersenCombiner);
        let expected = combine(
            &combine(&Felt::ZERO, &felt(5)),
            &combine(&felt(7), &Felt::ZERO),
        );
        assert_eq!(commitment.root(), expected);
        assert_eq!(commitment.digests()[0].hash, expected);
        assert_eq!(commitment.digests()[0].value, Some(7));
    }

    #[test]
    fn empty_key_leaf() {
        let commitment = commit(&records![[] => 7], &PedersenCombiner);
        let expected = combine(
            &combine(&Felt::ZERO, &felt(7)),
            &combine(&felt(7), &Felt::ZERO),
        );
        assert_eq!(commitment.root(), expected);
        assert_eq!(commitment.digests()[0].composite, key![]);
    }

    #[test]
    fn empty_key_beside_other_leaves() {
        let commitment = commit(&records![[1] => 10, [] => 9], &PedersenCombiner);

        let empty = combine(
            &combine(&Felt::ZERO, &felt(9)),
            &combine(&felt(9), &Felt::ZERO),
        );
        let expected = combine(
            &combine(&empty, &felt(1)),
            &combine(&felt(10), &Felt::ZERO),
        );
        assert_eq!(commitment.root(), expected);
    }

    #[test]
    fn leaf_subtrees() {
        let commitment = commit(&records![[1] => 10, [2] => 20, [3] => 30], &PedersenCombiner);

        let leaf = |key: u64, value: u64| {
            combine(
                &combine(&Felt::ZERO, &felt(key)),
                &combine(&felt(value), &Felt::ZERO),
            )
        };
        let expected = combine(
            &combine(&leaf(1, 10), &felt(2)),
            &combine(&felt(20), &leaf(3, 30)),
        );
        assert_eq!(commitment.root(), expected);
    }

    #[test]
    fn nested_scopes() {
        let commitment = commit(&records![[0, 3, 10] => 1, [0, 3, 20] => 2], &PedersenCombiner);

        let leaf10 = combine(
            &combine(&Felt::ZERO, &felt(10)),
            &combine(&felt(1), &Felt::ZERO),
        );
        let leaf20 = combine(
            &combine(&leaf10, &felt(20)),
            &combine(&felt(2), &Felt::ZERO),
        );
        let scope3 = combine(
            &combine(&Felt::ZERO, &felt(3)),
            &combine(&leaf20, &Felt::ZERO),
        );
        let scope0 = combine(
            &combine(&Felt::ZERO, &felt(0)),
            &combine(&scope3, &Felt::ZERO),
        );

        assert_eq!(commitment.root(), scope0);
        assert_eq!(commitment.scope_root(&key![0, 3]), Some(leaf20));
        assert_eq!(commitment.scope_root(&key![0]), Some(scope3));

        let paths: Vec<String> = commitment
            .digests()
            .iter()
            .map(|digest| digest.path.to_string())
            .collect();
        assert_eq!(paths, ["M", "NM", "NN", "NNL"]);
    }

    #[test]
    fn closure_combiner() {
        let concat = |lhs: &Felt, rhs: &Felt| {
            let mut bytes = [0_u8; 32];
            for (out, (l, r)) in bytes
                .iter_mut()
                .zip(lhs.as_ref().iter().zip(rhs.as_ref().iter()))
            {
                *out = l.wrapping_mul(3).wrapping_add(*r);
            }
            Felt::new(bytes)
        };
        let commitment = commit(&records![[0, 1] => 1, [2] => 2], &concat);

        // Top siblings [scope 0, leaf 2]: pivot 1 puts leaf 2 at the root and
        // scope 0 on its left.
        let leaf1 = concat(&concat(&Felt::ZERO, &felt(1)), &concat(&felt(1), &Felt::ZERO));
        let scope0 = concat(&concat(&Felt::ZERO, &felt(0)), &concat(&leaf1, &Felt::ZERO));
        let root = concat(&concat(&scope0, &felt(2)), &concat(&felt(2), &Felt::ZERO));
        assert_eq!(commitment.root(), root);
    }

    #[test]
    fn value_change_changes_root() {
        let before = commit(&records![[0, 1] => 1, [0, 2] => 2], &PedersenCombiner);
        let after = commit(&records![[0, 1] => 1, [0, 2] => 3], &PedersenCombiner);
        assert_ne!(before.root(), after.root());
    }
}
