//! Parsing and reconciliation layer for pivot reports.
//!
//! Decodes workbooks, locates the unit and case pivot sheets, parses them
//! into tuples, merges those into unified records and computes the
//! aggregates the report layer displays and exports.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod header;
pub mod locator;
pub mod parser;
pub mod reconciler;
pub mod workbook;

pub use pivot_core as core;
