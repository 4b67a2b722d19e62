//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

mod commit;
mod generate;
mod graph;
mod sample;

pub use commit::{commit_records, commitment_report};
pub use generate::{generate_records, generate_records_file};
pub use graph::{export_graph, render_dot};
pub use sample::{sample_reads, sample_report};

/// Generates and prints the JSON schema for the `GeneratorConfig` struct.
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn generator_config_schema() -> eyre::Result<()> {
    let schema = schemars::schema_for!(wbt_core::schema::config::GeneratorConfig);
    let schema_str = serde_json::to_string_pretty(&schema)?;
    println!("Generator Configuration JSON Schema:\n{schema_str}");
    Ok(())
}
