//! Per-column missing-value percentages.

use crate::error::{EdaError, Result, ResultExt};
use crate::types::{MissingEntry, MissingSummary};
use crate::utils::missing_count;
use polars::prelude::*;
use tracing::{debug, info};

/// Missing-value analysis over a whole dataset.
pub struct MissingValueAnalyzer;

impl MissingValueAnalyzer {
    /// Compute the missing-value percentage of every column.
    ///
    /// The denominator is the dataset's row count, so a dataset without rows
    /// is rejected with [`EdaError::EmptyDataset`]. Entries are sorted by
    /// percentage descending; ties keep the dataset's column order.
    pub fn summarize(df: &DataFrame) -> Result<MissingSummary> {
        let total_rows = df.height();
        if total_rows == 0 {
            return Err(EdaError::EmptyDataset);
        }

        let mut entries = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let missing = missing_count(series)
                .context(format!("Counting missing values in '{}'", series.name()))?;
            let percentage = (missing as f64 / total_rows as f64) * 100.0;

            debug!(
                "Column '{}': {} of {} missing ({:.2}%)",
                series.name(),
                missing,
                total_rows,
                percentage
            );

            entries.push(MissingEntry {
                column: series.name().to_string(),
                missing_count: missing,
                percentage,
            });
        }

        // sort_by is stable, so ties keep column order
        entries.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        info!(
            "Missing summary: {} columns, {} with missing values",
            entries.len(),
            entries.iter().filter(|e| e.missing_count > 0).count()
        );

        Ok(MissingSummary {
            total_rows,
            entries,
        })
    }
}

/// Compute per-column missing-value percentages, sorted descending.
///
/// Shorthand for [`MissingValueAnalyzer::summarize`].
pub fn compute_missing_summary(df: &DataFrame) -> Result<MissingSummary> {
    MissingValueAnalyzer::summarize(df)
}
