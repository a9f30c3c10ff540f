//! Shared utilities for the EDA helpers.
//!
//! Column type dispatch, missing-value detection and label formatting used by
//! both the missing-value summary and the distribution plotter.

use crate::error::{EdaError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date, datetime or time types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Column with no inferred type (every value is null)
    Null,
    /// Nested, binary, duration or otherwise opaque types
    Other,
}

/// How a column is drawn by the distribution plotter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ColumnKind {
    /// Density histogram
    Numeric,
    /// Grouped proportion bars
    Categorical,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating point type (may hold NaN).
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a calendar or clock type.
///
/// Durations are not included: they cannot be rendered as text labels.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(
        dtype,
        DataType::String | DataType::Categorical(_, _) | DataType::Enum(_, _)
    ) {
        DtypeCategory::String
    } else if matches!(dtype, DataType::Null) {
        DtypeCategory::Null
    } else {
        DtypeCategory::Other
    }
}

/// Decide how a column is plotted.
///
/// Numeric columns become histograms and every other scalar column is treated
/// as categorical. Columns whose values cannot be grouped are rejected.
pub fn classify_column(series: &Series) -> Result<ColumnKind> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => Ok(ColumnKind::Numeric),
        DtypeCategory::Datetime
        | DtypeCategory::Boolean
        | DtypeCategory::String
        | DtypeCategory::Null => Ok(ColumnKind::Categorical),
        DtypeCategory::Other => Err(EdaError::UnsupportedColumnType {
            column: series.name().to_string(),
            dtype: series.dtype().to_string(),
        }),
    }
}

// =============================================================================
// Missing Value Utilities
// =============================================================================

/// Count missing values in a Series.
///
/// Nulls are always missing; in float columns NaN is missing as well.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    let nan_count = if is_float_dtype(series.dtype()) {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .filter(|v| v.is_some_and(f64::is_nan))
            .count()
    } else {
        0
    };

    Ok(series.null_count() + nan_count)
}

/// Extract a numeric Series as `f64` values, mapping NaN to `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

// =============================================================================
// Label Utilities
// =============================================================================

/// Truncate a label to `max_chars` characters, appending `...` when shortened.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::utils::truncate_label;
///
/// assert_eq!(truncate_label("Southampton", 10), "Southampto...");
/// assert_eq!(truncate_label("Cherbourg", 10), "Cherbourg");
/// ```
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &label[..cut]),
        None => label.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
