//! Composite keys and the records they address.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered sequence of integer components addressing a value across nested
/// scopes (contract, attribute, field, mapping keys...).
///
/// Ordering is component-wise; a strict prefix sorts before every extension
/// of it.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct CompositeKey(Vec<u64>);

impl CompositeKey {
    /// Create a composite key from its components.
    #[must_use]
    pub const fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    /// The key components, outermost first.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The component at `depth`, if present.
    #[must_use]
    pub fn component(&self, depth: usize) -> Option<u64> {
        self.0.get(depth).copied()
    }

    /// The final component.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.0.last().copied()
    }

    /// The first `len` components as a new key.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        self.0.iter().take(len).copied().collect()
    }

    /// Whether `prefix` is a (not necessarily strict) prefix of this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &[u64]) -> bool {
        self.0.starts_with(prefix)
    }

    /// Copy of this key with the final component replaced by `component`.
    ///
    /// Returns `None` for an empty key.
    #[must_use]
    pub fn with_last(&self, component: u64) -> Option<Self> {
        let mut components = self.0.clone();
        let last = components.last_mut()?;
        *last = component;
        Some(Self(components))
    }
}

impl From<Vec<u64>> for CompositeKey {
    fn from(components: Vec<u64>) -> Self {
        Self(components)
    }
}

impl FromIterator<u64> for CompositeKey {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{component}")?;
        }
        write!(f, "]")
    }
}

/// A composite key paired with its primitive value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    /// Position of the value across nested scopes.
    pub key: CompositeKey,
    /// The primitive value.
    pub value: u64,
}

impl Record {
    /// Create a new record.
    #[must_use]
    pub const fn new(key: CompositeKey, value: u64) -> Self {
        Self { key, value }
    }
}

/// Formats as one line of the record text format: key components followed by
/// the value, space separated.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for component in self.key.components() {
            write!(f, "{component} ")?;
        }
        write!(f, "{}", self.value)
    }
}
