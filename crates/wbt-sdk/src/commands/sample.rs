use std::path::PathBuf;

use tracing::{info, instrument};
use wbt_core::schema::report::{SampleEntry, SampleReport};
use wbt_tree::{ReadSample, WeightBalancedTree};

use crate::common::{build_tree, read_records, rng_from_seed, write_json};

/// Select proof samples from a record file's tree and export them.
///
/// # Errors
/// Returns an error if the records are unreadable or violate the tree's
/// structural contract, if more samples are requested than there are
/// leaves, or if writing the report fails.
#[instrument(skip_all, fields(records = %records_file.display(), exist = exist_amount, miss = miss_amount))]
pub async fn sample_reads(
    records_file: PathBuf,
    exist_amount: usize,
    miss_amount: usize,
    seed: Option<u64>,
    samples_out: PathBuf,
) -> eyre::Result<()> {
    let records = read_records(&records_file).await?;
    let tree = build_tree(records).await?;

    let mut rng = rng_from_seed(seed);
    let samples = tree.select_reads(exist_amount, miss_amount, &mut rng)?;
    info!(count = samples.len(), "Selected reads");

    write_json(&samples_out, &sample_report(&tree, samples)).await?;
    info!(file = ?samples_out, "Exported samples");
    Ok(())
}

/// Serializable view of selected samples.
#[must_use]
pub fn sample_report(tree: &WeightBalancedTree, samples: Vec<ReadSample>) -> SampleReport {
    SampleReport {
        root: tree.root().to_bytes(),
        samples: samples
            .into_iter()
            .map(|sample| SampleEntry {
                key: sample.key,
                origin: sample.origin,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use wbt_core::schema::report::SampleOrigin;

    use super::*;

    #[tokio::test]
    async fn exports_samples() {
        let dir = tempfile::tempdir().expect("tempdir");
        let records_file = dir.path().join("records.txt");
        let samples_file = dir.path().join("samples.json");
        std::fs::write(&records_file, "0 0 1 5\n0 0 2 7 9\n0 0 2 8 1\n").expect("write records");

        sample_reads(records_file, 2, 1, Some(3), samples_file.clone())
            .await
            .expect("sample");

        let json = std::fs::read_to_string(&samples_file).expect("read samples");
        let report: SampleReport = serde_json::from_str(&json).expect("parse samples");
        let existing = report
            .samples
            .iter()
            .filter(|entry| entry.origin == SampleOrigin::Existing)
            .count();
        assert_eq!(existing, 2);
        assert!(report.samples.len() <= 3);
    }

    #[tokio::test]
    async fn too_many_samples_fail() {
        let dir = tempfile::tempdir().expect("tempdir");
        let records_file = dir.path().join("records.txt");
        std::fs::write(&records_file, "0 0 1 5\n").expect("write records");

        let result = sample_reads(records_file, 2, 0, None, dir.path().join("s.json")).await;
        assert!(result.is_err());
    }
}
