//! File-format adapters used by the CLI.

pub mod csv;
pub mod json;
