//! Fixed-width field elements consumed by the hash primitive.

use std::fmt;

/// Size of a serialized field element in bytes.
pub const FELT_SIZE: usize = 32;

/// A 256-bit field element in little-endian byte order.
///
/// Integer keys and values embed into the low bytes. Hash outputs are treated
/// as opaque; the core never inspects them beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Felt([u8; FELT_SIZE]);

impl Felt {
    /// The combine-identity value. Empty subtrees hash to it.
    pub const ZERO: Self = Self([0_u8; FELT_SIZE]);

    /// Create a field element from its little-endian bytes.
    #[must_use]
    pub const fn new(bytes: [u8; FELT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; FELT_SIZE] {
        self.0
    }

    /// Whether this is the combine-identity value.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        let mut bytes = [0_u8; FELT_SIZE];
        if let Some((low, _)) = bytes.split_first_chunk_mut::<8>() {
            *low = value.to_le_bytes();
        }
        Self(bytes)
    }
}

impl From<[u8; FELT_SIZE]> for Felt {
    fn from(bytes: [u8; FELT_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Felt> for [u8; FELT_SIZE] {
    fn from(felt: Felt) -> Self {
        felt.0
    }
}

impl AsRef<[u8; FELT_SIZE]> for Felt {
    fn as_ref(&self) -> &[u8; FELT_SIZE] {
        &self.0
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
