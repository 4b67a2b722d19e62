//! Shared test utilities for the workspace.

#[doc(hidden)]
pub use wbt_core;

/// Helper macro to build a `CompositeKey` from its components.
#[macro_export]
macro_rules! key {
    ($($c:expr),* $(,)?) => {
        $crate::wbt_core::base::CompositeKey::new(vec![$( $c ),*])
    };
}

/// Helper macro to build a `Record`: `rec!([0, 3, 10] => 1)`.
#[macro_export]
macro_rules! rec {
    ([$($c:expr),* $(,)?] => $v:expr) => {
        $crate::wbt_core::base::Record::new($crate::key!($($c),*), $v)
    };
}

/// Helper macro to build `SortedRecords` from unsorted record literals.
#[macro_export]
macro_rules! records {
    ($([$($c:expr),* $(,)?] => $v:expr),* $(,)?) => {
        $crate::wbt_core::base::SortedRecords::new(vec![$( $crate::rec!([$($c),*] => $v) ),*])
    };
}
