//! Helpers shared by the command workflows.

use std::path::Path;

use eyre::Context as _;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use serde::Serialize;
use wbt_core::base::{SortedRecords, parse_records};
use wbt_tree::WeightBalancedTree;

/// Read and sort a record file.
///
/// # Errors
/// Returns an error if the file cannot be read or holds malformed records.
pub async fn read_records(path: &Path) -> eyre::Result<SortedRecords> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    let records = parse_records(&text)
        .with_context(|| format!("Malformed records file {}", path.display()))?;
    Ok(SortedRecords::new(records))
}

/// Build and commit the tree off the async runtime.
///
/// # Errors
/// Returns an error if the records violate the tree's structural contract.
pub async fn build_tree(records: SortedRecords) -> eyre::Result<WeightBalancedTree> {
    let tree = tokio::task::spawn_blocking(move || WeightBalancedTree::build(&records)).await??;
    Ok(tree)
}

/// Seeded RNG when `seed` is given, OS-seeded otherwise.
#[must_use]
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Serialize `value` as pretty JSON into `path`.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
