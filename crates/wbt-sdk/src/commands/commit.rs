use std::path::PathBuf;

use tracing::{info, instrument};
use wbt_core::schema::report::{CommitmentReport, NodeReport};
use wbt_tree::WeightBalancedTree;

use crate::common::{build_tree, read_records, write_json};

/// Commit to a record file and export the commitment report.
///
/// # Errors
/// Returns an error if the records are unreadable or violate the tree's
/// structural contract, or if writing the report fails.
#[instrument(skip_all, fields(records = %records_file.display()))]
pub async fn commit_records(records_file: PathBuf, report_out: PathBuf) -> eyre::Result<()> {
    let records = read_records(&records_file).await?;
    info!(count = records.len(), "Loaded records");

    let tree = build_tree(records).await?;
    info!(root = %tree.root(), "Computed root hash");

    write_json(&report_out, &commitment_report(&tree)).await?;
    info!(file = ?report_out, "Exported commitment report");
    Ok(())
}

/// Serializable view of a tree's commitment.
#[must_use]
pub fn commitment_report(tree: &WeightBalancedTree) -> CommitmentReport {
    let nodes = tree
        .commitment()
        .digests()
        .iter()
        .map(|digest| NodeReport {
            path: digest.path.to_string(),
            nesting: digest.nesting,
            key: digest.composite.clone(),
            value: digest.value,
            hash: digest.hash.to_bytes(),
            nested_root: digest.nested_root.map(|root| root.to_bytes()),
        })
        .collect();

    CommitmentReport {
        root: tree.root().to_bytes(),
        records: tree.shaped().forest().record_count(),
        scopes: tree.flattened().scope_count(),
        nodes,
    }
}
