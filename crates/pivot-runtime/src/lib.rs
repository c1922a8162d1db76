//! Runtime layer for pivot reports.
//!
//! Owns the asynchronous file read and the replace-on-load data set that the
//! report binary renders from.

pub mod session;

pub use pivot_core as core;
pub use pivot_data as data;
