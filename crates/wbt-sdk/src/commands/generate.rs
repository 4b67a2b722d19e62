use std::path::PathBuf;

use eyre::Context as _;
use rand::Rng;
use rand::distr::Distribution as _;
use rand::distr::weighted::WeightedIndex;
use rand::seq::index;
use tracing::{info, instrument};
use wbt_core::base::{CompositeKey, Record, format_records};
use wbt_core::schema::config::{ConfigError, GeneratorConfig};

use crate::common::rng_from_seed;

/// Generate a synthetic record file.
///
/// Settings come from `config_file` when given, the defaults otherwise.
///
/// # Errors
/// Returns an error if the configuration is unreadable or inconsistent, or if
/// writing the output fails.
#[instrument(skip_all, fields(output = %output.display()))]
pub async fn generate_records_file(
    config_file: Option<PathBuf>,
    output: PathBuf,
    seed: Option<u64>,
) -> eyre::Result<()> {
    let config = match config_file {
        Some(path) => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read generator config {}", path.display()))?;
            serde_json::from_str::<GeneratorConfig>(&json)
                .with_context(|| format!("Failed to parse generator config {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    let mut rng = rng_from_seed(seed);
    let records = generate_records(&config, &mut rng)?;
    info!(count = records.len(), "Generated records");

    tokio::fs::write(&output, format_records(&records))
        .await
        .with_context(|| format!("Failed to write records file {}", output.display()))?;
    info!(file = ?output, "Exported records");
    Ok(())
}

/// Generate records for every contract, attribute and field of `config`.
///
/// Each field draws a mapping depth from `depth_weights`. Depth 0 is a
/// primitive field holding one value; depth `d` nests `d` mappings whose keys
/// are sampled without replacement, with a fresh size and key sample for
/// every enclosing key.
///
/// # Errors
/// Returns an error if `config` is inconsistent.
pub fn generate_records<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Record>, ConfigError> {
    config.validate()?;
    let depths =
        WeightedIndex::new(&config.depth_weights).map_err(|_| ConfigError::NoDepthWeights)?;
    let field_depths: Vec<usize> = (0..config.fields)
        .map(|_| depths.sample(rng))
        .collect();

    let mut records = Vec::new();
    for contract in 0..config.contracts {
        for attribute in 0..config.attributes {
            for (field, depth) in (0..config.fields).zip(&field_depths) {
                let mut prefix = vec![contract, attribute, field];
                emit_mapping(config, rng, &mut prefix, *depth, &mut records);
            }
        }
    }
    Ok(records)
}

/// Emit the records below `prefix`, `depth` mapping levels deep.
fn emit_mapping<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
    prefix: &mut Vec<u64>,
    depth: usize,
    records: &mut Vec<Record>,
) {
    let Some(inner) = depth.checked_sub(1) else {
        let value = rng.random_range(0..config.max_number);
        records.push(Record::new(CompositeKey::new(prefix.clone()), value));
        return;
    };

    let size = rng.random_range(config.min_mapping_size..config.max_mapping_size);
    let key_space = usize::try_from(config.max_number).unwrap_or(usize::MAX);
    for key in index::sample(rng, key_space, size).iter() {
        prefix.push(u64::try_from(key).unwrap_or(u64::MAX));
        emit_mapping(config, rng, prefix, inner, records);
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use wbt_core::base::{SortedRecords, parse_records};

    use super::*;

    #[test]
    fn primitive_fields_only() {
        let config = GeneratorConfig {
            fields: 4,
            depth_weights: vec![1],
            ..GeneratorConfig::default()
        };
        let records = generate_records(&config, &mut StdRng::seed_from_u64(1)).expect("records");

        assert_eq!(records.len(), 4);
        for (field, record) in (0..4_u64).zip(&records) {
            assert_eq!(record.key.components(), [0, 0, field]);
            assert!(record.value < config.max_number);
        }
    }

    #[test]
    fn nested_mappings_have_unique_keys() {
        let config = GeneratorConfig {
            contracts: 2,
            fields: 6,
            depth_weights: vec![0, 0, 0, 1],
            ..GeneratorConfig::default()
        };
        let records = generate_records(&config, &mut StdRng::seed_from_u64(2)).expect("records");

        assert!(records.iter().all(|record| record.key.len() == 6));
        assert!(records.len() >= 2 * 6);
        let count = records.len();
        let sorted = SortedRecords::new(records);
        assert_eq!(sorted.len(), count);
        assert!(
            sorted
                .windows(2)
                .all(|pair| pair.first().map(|r| &r.key) < pair.get(1).map(|r| &r.key))
        );
    }

    #[test]
    fn mapping_sizes_respect_bounds() {
        let config = GeneratorConfig {
            fields: 1,
            min_mapping_size: 2,
            max_mapping_size: 3,
            depth_weights: vec![0, 1],
            ..GeneratorConfig::default()
        };
        let records = generate_records(&config, &mut StdRng::seed_from_u64(3)).expect("records");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn same_seed_same_records() {
        let config = GeneratorConfig::default();
        let first = generate_records(&config, &mut StdRng::seed_from_u64(9)).expect("first");
        let second = generate_records(&config, &mut StdRng::seed_from_u64(9)).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn output_parses_back() {
        let config = GeneratorConfig::default();
        let records = generate_records(&config, &mut StdRng::seed_from_u64(4)).expect("records");
        let text = format_records(&records);
        assert_eq!(parse_records(&text).expect("parse"), records);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GeneratorConfig {
            depth_weights: vec![],
            ..GeneratorConfig::default()
        };
        assert_eq!(
            generate_records(&config, &mut StdRng::seed_from_u64(0)),
            Err(ConfigError::NoDepthWeights)
        );
    }

    #[tokio::test]
    async fn writes_record_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("records.txt");
        generate_records_file(None, output.clone(), Some(5))
            .await
            .expect("generate");

        let text = std::fs::read_to_string(&output).expect("read");
        let records = parse_records(&text).expect("parse");
        assert!(!records.is_empty());
    }
}
