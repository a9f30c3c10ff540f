//! Missing-value summary module.
//!
//! Computes the share of missing values in every column of a dataset and
//! orders the columns from most to least incomplete.

mod summary;

pub use summary::{MissingValueAnalyzer, compute_missing_summary};
