//! Shared types for the pivot report workspace.
//!
//! Cell and record models, the error taxonomy, CLI settings and pt-BR number
//! formatting used by the parsing, runtime and reporting crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
