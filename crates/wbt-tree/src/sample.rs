//! Selection of composite keys for exercising inclusion/exclusion proofs.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;
use wbt_core::base::CompositeKey;
use wbt_core::schema::report::SampleOrigin;

use crate::error::TreeError;
use crate::flat::Flattened;

/// A selected key and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadSample {
    /// Composite key to look up.
    pub key: CompositeKey,
    /// Whether the key was taken as-is or perturbed.
    pub origin: SampleOrigin,
}

/// Select `exist_amount` existing leaf keys and `miss_amount` perturbed ones.
///
/// Both draws are uniform without replacement over the leaves. A perturbed
/// key is a drawn leaf key with its final component incremented (wrapping);
/// it usually misses, but may land on another existing key. The empty key
/// has no component to perturb and yields no perturbed sample. Keys already
/// selected are not repeated, so fewer than `exist_amount + miss_amount`
/// samples may be returned.
///
/// # Errors
///
/// Returns [`TreeError::InsufficientLeaves`] when either amount exceeds the
/// number of leaves.
pub fn select_reads<R: Rng + ?Sized>(
    flat: &Flattened,
    exist_amount: usize,
    miss_amount: usize,
    rng: &mut R,
) -> Result<Vec<ReadSample>, TreeError> {
    let leaves: Vec<&CompositeKey> = flat.leaves().map(|node| &node.composite).collect();
    for (origin, requested) in [
        (SampleOrigin::Existing, exist_amount),
        (SampleOrigin::Perturbed, miss_amount),
    ] {
        if requested > leaves.len() {
            return Err(TreeError::InsufficientLeaves {
                origin,
                requested,
                available: leaves.len(),
            });
        }
    }

    let mut seen = HashSet::with_capacity(exist_amount.saturating_add(miss_amount));
    let mut samples = Vec::with_capacity(exist_amount.saturating_add(miss_amount));

    let existing = index::sample(rng, leaves.len(), exist_amount);
    for key in existing.iter().filter_map(|i| leaves.get(i)) {
        if seen.insert((*key).clone()) {
            samples.push(ReadSample {
                key: (*key).clone(),
                origin: SampleOrigin::Existing,
            });
        }
    }

    let perturbed = index::sample(rng, leaves.len(), miss_amount);
    for source in perturbed.iter().filter_map(|i| leaves.get(i)) {
        let Some(key) = source
            .last()
            .and_then(|last| source.with_last(last.wrapping_add(1)))
        else {
            continue;
        };
        if seen.insert(key.clone()) {
            samples.push(ReadSample {
                key,
                origin: SampleOrigin::Perturbed,
            });
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_utils::{key, records};

    use super::*;
    use crate::group::ScopeForest;
    use crate::shape::ShapedForest;

    fn flatten(records: &wbt_core::base::SortedRecords) -> Flattened {
        ShapedForest::assign(ScopeForest::group(records).expect("group"))
            .expect("assign")
            .flatten()
            .expect("flatten")
    }

    fn sample_tree() -> Flattened {
        flatten(&records![
            [0, 0, 1] => 1,
            [0, 0, 2] => 2,
            [0, 1, 5] => 3,
            [0, 1, 9] => 4,
            [1, 0, 3] => 5,
        ])
    }

    #[test]
    fn existing_keys_are_leaves() {
        let flat = sample_tree();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = select_reads(&flat, 5, 0, &mut rng).expect("samples");

        assert_eq!(samples.len(), 5);
        for sample in &samples {
            assert_eq!(sample.origin, SampleOrigin::Existing);
            assert!(flat.leaves().any(|leaf| leaf.composite == sample.key));
        }
    }

    #[test]
    fn perturbed_keys_bump_last_component() {
        let flat = sample_tree();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = select_reads(&flat, 0, 5, &mut rng).expect("samples");

        // [0, 0, 1] bumps onto [0, 0, 2], which is still a distinct key.
        assert_eq!(samples.len(), 5);
        for sample in &samples {
            assert_eq!(sample.origin, SampleOrigin::Perturbed);
            let source = sample
                .key
                .with_last(sample.key.last().expect("last").wrapping_sub(1))
                .expect("non-empty");
            assert!(flat.leaves().any(|leaf| leaf.composite == source));
        }
    }

    #[test]
    fn perturbed_duplicates_of_existing_are_dropped() {
        let flat = flatten(&records![[0, 1] => 1, [0, 2] => 2]);
        let mut rng = StdRng::seed_from_u64(1);
        let samples = select_reads(&flat, 2, 2, &mut rng).expect("samples");

        // [0, 1] perturbs onto the already selected [0, 2].
        assert_eq!(samples.len(), 3);
        assert!(samples.contains(&ReadSample {
            key: key![0, 3],
            origin: SampleOrigin::Perturbed,
        }));
    }

    #[test]
    fn empty_key_is_read_but_not_perturbed() {
        let flat = flatten(&records![[] => 7]);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            select_reads(&flat, 1, 0, &mut rng),
            Ok(vec![ReadSample {
                key: key![],
                origin: SampleOrigin::Existing,
            }])
        );
        assert_eq!(select_reads(&flat, 0, 1, &mut rng), Ok(vec![]));
    }

    #[test]
    fn too_many_samples() {
        let flat = sample_tree();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            select_reads(&flat, 6, 0, &mut rng),
            Err(TreeError::InsufficientLeaves {
                origin: SampleOrigin::Existing,
                requested: 6,
                available: 5,
            })
        );
        assert!(matches!(
            select_reads(&flat, 0, 6, &mut rng),
            Err(TreeError::InsufficientLeaves {
                origin: SampleOrigin::Perturbed,
                ..
            })
        ));
    }

    #[test]
    fn empty_tree() {
        let flat = flatten(&records![]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(select_reads(&flat, 0, 0, &mut rng), Ok(vec![]));
    }

    #[test]
    fn deterministic_for_a_seed() {
        let flat = sample_tree();
        let first = select_reads(&flat, 3, 3, &mut StdRng::seed_from_u64(42)).expect("first");
        let second = select_reads(&flat, 3, 3, &mut StdRng::seed_from_u64(42)).expect("second");
        assert_eq!(first, second);
    }
}
