//! CLI command implementations.

pub mod config;
pub mod ingest;
pub mod remove;
