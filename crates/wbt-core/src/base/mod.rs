//! Foundational primitive types and record helpers.

mod felt;
mod key;
mod records;

pub use felt::{FELT_SIZE, Felt};
pub use key::{CompositeKey, Record};
pub use records::{MAX_KEY_DEPTH, RecordError, SortedRecords, format_records, parse_records};
