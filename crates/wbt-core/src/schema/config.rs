use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base::MAX_KEY_DEPTH;

/// Settings for the synthetic record generator.
///
/// Every field falls back to its default when omitted from the JSON document.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of contracts.
    pub contracts: u64,
    /// Number of attributes per contract.
    pub attributes: u64,
    /// Number of fields per attribute.
    pub fields: u64,
    /// Exclusive upper bound on generated keys and values.
    pub max_number: u64,
    /// Minimum number of keys in a mapping (inclusive).
    pub min_mapping_size: usize,
    /// Maximum number of keys in a mapping (exclusive).
    pub max_mapping_size: usize,
    /// Relative weights of mapping depths, index 0 being a primitive field.
    pub depth_weights: Vec<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            contracts: 1,
            attributes: 1,
            fields: 10,
            max_number: 256,
            min_mapping_size: 1,
            max_mapping_size: 6,
            depth_weights: vec![8, 4, 2, 1],
        }
    }
}

/// Inconsistent generator settings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Keys and values are drawn from an empty range.
    #[error("max_number must be greater than zero")]
    ZeroMaxNumber,

    /// Mappings would be generated without keys.
    #[error("min_mapping_size must be at least 1")]
    ZeroMappingSize,

    /// The mapping size range is empty.
    #[error("mapping size range {min}..{max} is empty")]
    EmptyMappingRange {
        /// Configured minimum.
        min: usize,
        /// Configured exclusive maximum.
        max: usize,
    },

    /// Mapping keys are sampled without replacement and would run out.
    #[error("mapping size {size} exceeds the {max_number} distinct keys available")]
    MappingTooLarge {
        /// Largest mapping size that can be drawn.
        size: usize,
        /// Configured exclusive upper bound on keys.
        max_number: u64,
    },

    /// No mapping depth can be drawn.
    #[error("depth_weights must contain at least one non-zero weight")]
    NoDepthWeights,

    /// The deepest mapping would produce keys longer than [`MAX_KEY_DEPTH`].
    #[error("depth_weights allows keys of {depth} components, at most {max} are supported", max = MAX_KEY_DEPTH)]
    TooDeep {
        /// Key length of the deepest configurable mapping.
        depth: usize,
    },
}

impl GeneratorConfig {
    /// Check that records can be generated with these settings.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_number == 0 {
            return Err(ConfigError::ZeroMaxNumber);
        }
        if self.min_mapping_size == 0 {
            return Err(ConfigError::ZeroMappingSize);
        }
        if self.min_mapping_size >= self.max_mapping_size {
            return Err(ConfigError::EmptyMappingRange {
                min: self.min_mapping_size,
                max: self.max_mapping_size,
            });
        }
        let largest = self.max_mapping_size.saturating_sub(1);
        if u64::try_from(largest).map_or(true, |size| size > self.max_number) {
            return Err(ConfigError::MappingTooLarge {
                size: largest,
                max_number: self.max_number,
            });
        }
        if self.depth_weights.iter().all(|weight| *weight == 0) {
            return Err(ConfigError::NoDepthWeights);
        }
        // contract, attribute and field precede the mapping keys
        let depth = self.depth_weights.len().saturating_add(2);
        if depth > MAX_KEY_DEPTH {
            return Err(ConfigError::TooDeep { depth });
        }
        Ok(())
    }
}
