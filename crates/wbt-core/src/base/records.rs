//! Record sequences: the line-oriented text format and the sorted wrapper
//! the grouper consumes.

use std::cmp::Ordering;
use std::ops::Deref;

use thiserror::Error;

use super::key::{CompositeKey, Record};

/// Longest composite key accepted from record text.
///
/// Shape assignment and hashing descend once per nesting level, so the key
/// depth bounds their stack use and the length of every node path.
pub const MAX_KEY_DEPTH: usize = 64;

/// Errors raised while reading or ordering records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// A token is not an unsigned integer.
    #[error("Line {line}: invalid number {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A key has more components than [`MAX_KEY_DEPTH`].
    #[error("Line {line}: key has {depth} components, at most {max} are supported", max = MAX_KEY_DEPTH)]
    KeyTooDeep {
        /// 1-based line number.
        line: usize,
        /// Number of key components on the line.
        depth: usize,
    },

    /// A record sorts before its predecessor.
    #[error("Record {index} with key {key} sorts before the preceding key {previous}")]
    OutOfOrder {
        /// Index of the record in the input sequence.
        index: usize,
        /// Key of the preceding record.
        previous: CompositeKey,
        /// Key of the offending record.
        key: CompositeKey,
    },

    /// A record repeats its predecessor's key.
    #[error("Record {index} repeats key {key}")]
    DuplicateKey {
        /// Index of the record in the input sequence.
        index: usize,
        /// The repeated key.
        key: CompositeKey,
    },
}

/// Parse the record text format.
///
/// Each non-blank line holds space-separated unsigned integers; the last one
/// is the value and the rest form the composite key. A line holding only a
/// value is a record with an empty key. Keys longer than [`MAX_KEY_DEPTH`]
/// are rejected.
///
/// # Errors
/// Returns an error naming the line of the first malformed entry.
pub fn parse_records(text: &str) -> Result<Vec<Record>, RecordError> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx.saturating_add(1);
        let mut numbers = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<u64>()
                    .map_err(|_| RecordError::InvalidNumber {
                        line: line_no,
                        token: token.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(value) = numbers.pop() else {
            continue;
        };
        if numbers.len() > MAX_KEY_DEPTH {
            return Err(RecordError::KeyTooDeep {
                line: line_no,
                depth: numbers.len(),
            });
        }
        records.push(Record::new(CompositeKey::new(numbers), value));
    }
    Ok(records)
}

/// Format records in the text format accepted by [`parse_records`].
#[must_use]
pub fn format_records(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

/// Records in strictly ascending composite-key order.
///
/// This is the only input the grouper accepts, so ordering violations are
/// caught before any tree is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortedRecords(Vec<Record>);

impl SortedRecords {
    /// Sort records and drop repeated keys; the last occurrence of a key wins.
    #[must_use]
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| a.key.cmp(&b.key));

        let mut sorted: Vec<Record> = Vec::with_capacity(records.len());
        for record in records {
            match sorted.last_mut() {
                Some(last) if last.key == record.key => *last = record,
                _ => sorted.push(record),
            }
        }
        Self(sorted)
    }

    /// Wrap records that the caller guarantees are already sorted.
    ///
    /// # Errors
    /// Returns an error naming the first record that is out of order or
    /// repeats a key.
    pub fn try_from_sorted(records: Vec<Record>) -> Result<Self, RecordError> {
        for (idx, pair) in records.windows(2).enumerate() {
            let [previous, current] = pair else {
                continue;
            };
            let index = idx.saturating_add(1);
            match previous.key.cmp(&current.key) {
                Ordering::Less => {}
                Ordering::Equal => {
                    return Err(RecordError::DuplicateKey {
                        index,
                        key: current.key.clone(),
                    });
                }
                Ordering::Greater => {
                    return Err(RecordError::OutOfOrder {
                        index,
                        previous: previous.key.clone(),
                        key: current.key.clone(),
                    });
                }
            }
        }
        Ok(Self(records))
    }

    /// Unwrap into the underlying vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<Record> {
        self.0
    }
}

impl Deref for SortedRecords {
    type Target = [Record];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
