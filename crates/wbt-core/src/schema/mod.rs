//! JSON-facing models: generator configuration and exported reports.

/// Synthetic record generator configuration.
pub mod config;
/// Commitment and proof-sample reports.
pub mod report;
