//! CLI-independent workflows for building, exporting and sampling
//! weight-balanced commitment trees.

pub mod commands;
pub mod common;
