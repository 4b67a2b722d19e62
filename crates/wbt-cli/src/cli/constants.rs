//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Common
pub const WBT_RECORDS_FILE: &str = "WBT_RECORDS_FILE";
pub const WBT_SEED: &str = "WBT_SEED";

// Generate
pub const WBT_GENERATOR_CONFIG: &str = "WBT_GENERATOR_CONFIG";
pub const WBT_RECORDS_OUT: &str = "WBT_RECORDS_OUT";

// Commit
pub const WBT_REPORT_OUT: &str = "WBT_REPORT_OUT";

// Sample
pub const WBT_EXIST_AMOUNT: &str = "WBT_EXIST_AMOUNT";
pub const WBT_MISS_AMOUNT: &str = "WBT_MISS_AMOUNT";
pub const WBT_SAMPLES_OUT: &str = "WBT_SAMPLES_OUT";

// Graph
pub const WBT_GRAPH_OUT: &str = "WBT_GRAPH_OUT";

// -------------------------
// Default values
// -------------------------

// File paths
pub const DEFAULT_RECORDS_FILE: &str = "initial_set.txt";
pub const DEFAULT_REPORT_FILE: &str = "commitment.json";
pub const DEFAULT_SAMPLES_FILE: &str = "samples.json";
pub const DEFAULT_GRAPH_FILE: &str = "tree.dot";

// Sampling
pub const DEFAULT_EXIST_AMOUNT: &str = "4";
pub const DEFAULT_MISS_AMOUNT: &str = "1";
