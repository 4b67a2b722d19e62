use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;

use crate::base::CompositeKey;

/// Root commitment of a record set together with every node's digest.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Clone)]
pub struct CommitmentReport {
    /// Root hash of the outermost scope.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub root: [u8; 32],
    /// Number of records committed.
    pub records: usize,
    /// Number of nested scopes introduced by grouping.
    pub scopes: usize,
    /// Digests in path order.
    pub nodes: Vec<NodeReport>,
}

/// Digest of a single tree node.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Clone)]
pub struct NodeReport {
    /// Structural path from the outermost root.
    pub path: String,
    /// Nesting level, 0 being the outermost scope.
    pub nesting: usize,
    /// Composite key of the leaf, or the prefix identifying the nested scope.
    pub key: CompositeKey,
    /// Leaf value. Absent for scope roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    /// Hash of the subtree rooted at this node.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub hash: [u8; 32],
    /// Root hash of the nested scope. Present for scope roots only.
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub nested_root: Option<[u8; 32]>,
}

/// Where a proof sample key comes from.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SampleOrigin {
    /// Key of an existing leaf.
    Existing,
    /// Existing key with its final component perturbed; usually missing.
    Perturbed,
}

/// Composite keys selected for inclusion/exclusion proof testing.
#[serde_as]
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Clone)]
pub struct SampleReport {
    /// Root hash the samples were drawn against.
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    pub root: [u8; 32],
    /// Deduplicated sample keys.
    pub samples: Vec<SampleEntry>,
}

/// A single proof sample.
#[derive(Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Clone)]
pub struct SampleEntry {
    /// The sampled composite key.
    pub key: CompositeKey,
    /// How the key was obtained.
    pub origin: SampleOrigin,
}
