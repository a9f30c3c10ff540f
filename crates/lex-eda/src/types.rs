//! Result types for the missing-value summary and the distribution plot model.

use crate::utils::ColumnKind;
use serde::{Deserialize, Serialize};

// ============================================================================
// Missing Value Summary Types
// ============================================================================

/// Missing-value statistics for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    /// Column name as it appears in the dataset.
    pub column: String,
    /// Number of null (or NaN) values in the column.
    pub missing_count: usize,
    /// `missing_count / total_rows * 100`, in the range 0 - 100.
    pub percentage: f64,
}

/// Per-column missing-value percentages, ordered from most to least missing.
///
/// Columns with equal percentages keep their dataset order.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::compute_missing_summary;
///
/// let summary = compute_missing_summary(&df)?;
/// for entry in summary.iter() {
///     println!("{:<20} {:>6.2}%", entry.column, entry.percentage);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSummary {
    /// Number of rows used as the denominator.
    pub total_rows: usize,
    /// Entries sorted by `percentage`, descending.
    pub entries: Vec<MissingEntry>,
}

impl MissingSummary {
    /// Look up the percentage for a column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.percentage)
    }

    /// Iterate entries in descending percentage order.
    pub fn iter(&self) -> std::slice::Iter<'_, MissingEntry> {
        self.entries.iter()
    }

    /// Column names in descending percentage order.
    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.column.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns that have at least one missing value.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &MissingEntry> {
        self.entries.iter().filter(|e| e.missing_count > 0)
    }
}

impl<'a> IntoIterator for &'a MissingSummary {
    type Item = &'a MissingEntry;
    type IntoIter = std::slice::Iter<'a, MissingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Plot Grid Types
// ============================================================================

/// The figure model produced by the distribution plotter.
///
/// One populated subplot per non-target column in dataset order, laid out
/// row-major in a grid `ncols` wide. Cells after the last subplot are listed
/// in `hidden_cells` and are not drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotGrid {
    /// Column used to stratify every subplot.
    pub target_column: String,
    /// Distinct non-missing target values, in order of first appearance.
    pub classes: Vec<String>,
    /// Grid width in cells.
    pub ncols: usize,
    /// Grid height in cells.
    pub nrows: usize,
    pub subplots: Vec<Subplot>,
    /// Row-major indices of the empty cells removed from the figure.
    pub hidden_cells: Vec<usize>,
}

impl PlotGrid {
    /// Total number of grid cells (populated and hidden).
    pub fn cell_count(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Find the subplot for a column.
    pub fn subplot(&self, column: &str) -> Option<&Subplot> {
        self.subplots.iter().find(|s| s.column == column)
    }
}

/// A single populated cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subplot {
    /// Position in column-iteration order (row-major cell index).
    pub index: usize,
    pub column: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ColumnKind,
    pub chart: Chart,
    /// Per-class missing rates shown in the upper-left text box.
    pub missing_by_class: Vec<ClassMissing>,
    /// Only the first subplot carries a legend.
    pub show_legend: bool,
    /// Rotation of x tick labels in degrees (0 for histograms).
    pub x_tick_rotation: f64,
}

impl Subplot {
    /// Lines of the missing-value annotation box.
    pub fn annotation_lines(&self) -> Vec<String> {
        self.missing_by_class
            .iter()
            .map(|m| format!("{} Missing: {:.2}%", m.class, m.percentage))
            .collect()
    }

    /// Annotation box text, one class per line.
    pub fn annotation_text(&self) -> String {
        self.annotation_lines().join("\n")
    }
}

/// Missing-value rate of one column within the rows of one target class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMissing {
    pub class: String,
    /// Rows of this class in the dataset.
    pub rows: usize,
    /// Of those, rows where the column is missing.
    pub missing_count: usize,
    /// `missing_count / rows * 100`.
    pub percentage: f64,
}

/// Chart content of a subplot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    /// Overlaid per-class density histograms sharing bin edges.
    Density {
        /// `bins + 1` ascending edges (empty when the column has no values).
        edges: Vec<f64>,
        series: Vec<DensitySeries>,
    },
    /// Grouped within-class proportion bars.
    Proportion {
        /// Display labels of the bar groups, truncated for display.
        categories: Vec<String>,
        series: Vec<ProportionSeries>,
    },
}

/// Density histogram of one target class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySeries {
    pub class: String,
    /// Non-missing values of this class that were binned.
    pub count: usize,
    /// One density per bin; integrates to 1 when `count > 0`.
    pub densities: Vec<f64>,
}

/// Proportion bars of one target class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionSeries {
    pub class: String,
    /// One proportion per category, aligned with `Chart::Proportion::categories`.
    pub proportions: Vec<f64>,
}

impl ProportionSeries {
    pub fn total(&self) -> f64 {
        self.proportions.iter().sum()
    }
}
