//! Distribution plots stratified by a target column.
//!
//! This module builds one subplot per non-target column:
//! - Numeric columns: overlaid per-class density histograms
//! - Categorical columns: grouped within-class proportion bars
//! - Every subplot: per-class missing-value rates
//!
//! The figure is first built as a [`PlotGrid`] model and then rendered to SVG
//! with `plotters`. Neither step touches the filesystem.

pub mod histogram;
pub mod palette;
pub mod proportions;
mod render;

pub use render::render_svg;

use crate::config::PlotConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::types::{Chart, ClassMissing, DensitySeries, PlotGrid, Subplot};
use crate::utils::{ColumnKind, classify_column, is_float_dtype, missing_count, numeric_values};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A rendered figure: the grid model plus its SVG document.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFigure {
    pub grid: PlotGrid,
    pub svg: String,
}

/// Builds and renders distribution grids.
#[derive(Debug, Clone, Default)]
pub struct DistributionPlotter {
    config: PlotConfig,
}

impl DistributionPlotter {
    /// Create a plotter with a validated configuration.
    pub fn new(config: PlotConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Build the grid model and render it to SVG.
    pub fn plot(&self, df: &DataFrame, target: &str) -> Result<RenderedFigure> {
        let grid = self.build_grid(df, target)?;
        let svg = render_svg(&grid, &self.config).context("Rendering distribution grid")?;
        info!(
            "Rendered {} subplots ({}x{} grid) for target '{}'",
            grid.subplots.len(),
            grid.nrows,
            grid.ncols,
            target
        );
        Ok(RenderedFigure { grid, svg })
    }

    /// Build the grid model without rendering.
    ///
    /// Fails when the target column does not exist, when it is the only
    /// column, or when any involved column cannot be grouped.
    pub fn build_grid(&self, df: &DataFrame, target: &str) -> Result<PlotGrid> {
        let target_series = df
            .column(target)
            .map_err(|_| EdaError::ColumnNotFound(target.to_string()))?
            .as_materialized_series();
        classify_column(target_series)?;

        let plot_columns: Vec<&Series> = df
            .get_columns()
            .iter()
            .map(|c| c.as_materialized_series())
            .filter(|s| s.name().as_str() != target)
            .collect();
        if plot_columns.is_empty() {
            return Err(EdaError::NoPlottableColumns(target.to_string()));
        }

        let labels = target_labels(target_series).context("Reading target classes")?;
        let classes = distinct_classes(&labels);
        match classes.len() {
            0 => warn!("Target '{}' has no non-missing values", target),
            1 => warn!("Target '{}' has a single class; plots are not stratified", target),
            _ => debug!("Target '{}' classes: {:?}", target, classes),
        }

        let ncols = self.config.grid_columns;
        let nrows = plot_columns.len().div_ceil(ncols);

        let mut subplots = Vec::with_capacity(plot_columns.len());
        for (index, series) in plot_columns.into_iter().enumerate() {
            let subplot = self
                .build_subplot(index, series, &labels, &classes)
                .context(format!("Plotting column '{}'", series.name()))?;
            subplots.push(subplot);
        }

        let hidden_cells = (subplots.len()..nrows * ncols).collect();

        Ok(PlotGrid {
            target_column: target.to_string(),
            classes,
            ncols,
            nrows,
            subplots,
            hidden_cells,
        })
    }

    fn build_subplot(
        &self,
        index: usize,
        series: &Series,
        labels: &StringChunked,
        classes: &[String],
    ) -> Result<Subplot> {
        let kind = classify_column(series)?;
        let column = series.name().to_string();

        let mut missing_by_class = Vec::with_capacity(classes.len());
        for class in classes {
            let subset = series.filter(&labels.equal(class.as_str()))?;
            let rows = subset.len();
            let missing = missing_count(&subset)?;
            let percentage = if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64 * 100.0
            };
            missing_by_class.push(ClassMissing {
                class: class.clone(),
                rows,
                missing_count: missing,
                percentage,
            });
        }

        if !series.is_empty() && missing_count(series)? == series.len() {
            warn!("Column '{}' has no non-missing values", column);
        }

        let (chart, y_label, x_tick_rotation) = match kind {
            ColumnKind::Numeric => (
                self.density_chart(series, labels, classes)?,
                "Density",
                0.0,
            ),
            ColumnKind::Categorical => {
                let bars = proportions::class_proportions(
                    series,
                    labels,
                    classes,
                    self.config.max_label_chars,
                )?;
                (
                    Chart::Proportion {
                        categories: bars.categories,
                        series: bars.series,
                    },
                    "Proportion",
                    self.config.x_tick_rotation,
                )
            }
        };

        debug!("Built {:?} subplot {} for '{}'", kind, index, column);

        Ok(Subplot {
            index,
            title: column.clone(),
            x_label: column.clone(),
            y_label: y_label.to_string(),
            column,
            kind,
            chart,
            missing_by_class,
            show_legend: index == 0,
            x_tick_rotation,
        })
    }

    fn density_chart(
        &self,
        series: &Series,
        labels: &StringChunked,
        classes: &[String],
    ) -> Result<Chart> {
        // Bins are shared by all classes and ignore rows without a target
        let labelled = series.filter(&labels.is_not_null())?;
        let pooled = finite_values(&labelled)?;
        if pooled.len() < labelled.len() - missing_count(&labelled)? {
            warn!(
                "Column '{}' has infinite values; they are left out of the histogram",
                series.name()
            );
        }
        let edges = histogram::bin_edges(&pooled, self.config.bin_strategy);

        let mut density_series = Vec::with_capacity(classes.len());
        for class in classes {
            let subset = series.filter(&labels.equal(class.as_str()))?;
            let values = finite_values(&subset)?;
            density_series.push(DensitySeries {
                class: class.clone(),
                count: values.len(),
                densities: histogram::densities(&values, &edges),
            });
        }

        Ok(Chart::Density {
            edges,
            series: density_series,
        })
    }
}

/// Render per-class distribution plots with the default configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::plot_distributions_by_target;
///
/// let figure = plot_distributions_by_target(&df, "Survived")?;
/// std::fs::write("distributions.svg", &figure.svg)?;
/// ```
pub fn plot_distributions_by_target(df: &DataFrame, target: &str) -> Result<RenderedFigure> {
    DistributionPlotter::default().plot(df, target)
}

/// Target values as text, with NaN treated as missing.
fn target_labels(series: &Series) -> PolarsResult<StringChunked> {
    let text = if is_float_dtype(series.dtype()) {
        Series::new(series.name().clone(), numeric_values(series)?).cast(&DataType::String)?
    } else {
        series.cast(&DataType::String)?
    };
    Ok(text.str()?.clone())
}

/// Non-missing values that can be placed on a histogram axis.
fn finite_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(numeric_values(series)?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

/// Distinct non-missing labels in order of first appearance.
fn distinct_classes(labels: &StringChunked) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .flatten()
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinStrategy;
    use pretty_assertions::assert_eq;

    fn age_label_df() -> DataFrame {
        df![
            "age" => [Some(25.0), Some(f64::NAN), Some(30.0)],
            "label" => ["yes", "no", "yes"],
        ]
        .unwrap()
    }

    fn mixed_df() -> DataFrame {
        df![
            "age" => [Some(22.0), Some(38.0), None, Some(35.0), Some(54.0), Some(2.0)],
            "fare" => [7.25, 71.28, 7.92, 53.1, 51.86, 21.07],
            "embarked" => [Some("S"), Some("C"), Some("S"), None, Some("S"), Some("Q")],
            "survived" => [0i64, 1, 1, 1, 0, 0],
            "sex" => ["male", "female", "female", "female", "male", "male"],
        ]
        .unwrap()
    }

    #[test]
    fn test_example_grid_single_subplot() {
        let grid = DistributionPlotter::default()
            .build_grid(&age_label_df(), "label")
            .unwrap();

        assert_eq!(grid.classes, vec!["yes".to_string(), "no".to_string()]);
        assert_eq!(grid.subplots.len(), 1);
        assert_eq!((grid.nrows, grid.ncols), (1, 4));
        assert_eq!(grid.hidden_cells, vec![1, 2, 3]);

        let age = grid.subplot("age").unwrap();
        assert_eq!(age.kind, ColumnKind::Numeric);
        assert_eq!(age.y_label, "Density");
        assert_eq!(
            age.annotation_lines(),
            vec!["yes Missing: 0.00%", "no Missing: 100.00%"]
        );
    }

    #[test]
    fn test_target_excluded_and_order_preserved() {
        let grid = DistributionPlotter::default()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        let columns: Vec<&str> = grid.subplots.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["age", "fare", "embarked", "sex"]);
        assert!(grid.subplot("survived").is_none());
        assert!(grid.hidden_cells.is_empty());
    }

    #[test]
    fn test_grid_dimensions_follow_config() {
        let config = PlotConfig::builder().grid_columns(3).build().unwrap();
        let grid = DistributionPlotter::new(config)
            .unwrap()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        assert_eq!((grid.nrows, grid.ncols), (2, 3));
        assert_eq!(grid.cell_count(), 6);
        assert_eq!(grid.hidden_cells, vec![4, 5]);
    }

    #[test]
    fn test_legend_only_on_first_subplot() {
        let grid = DistributionPlotter::default()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        let legends: Vec<bool> = grid.subplots.iter().map(|s| s.show_legend).collect();
        assert_eq!(legends, vec![true, false, false, false]);
    }

    #[test]
    fn test_type_dispatch_and_labels() {
        let grid = DistributionPlotter::default()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        let fare = grid.subplot("fare").unwrap();
        assert_eq!(fare.kind, ColumnKind::Numeric);
        assert_eq!(fare.x_tick_rotation, 0.0);

        let embarked = grid.subplot("embarked").unwrap();
        assert_eq!(embarked.kind, ColumnKind::Categorical);
        assert_eq!(embarked.y_label, "Proportion");
        assert_eq!(embarked.title, "embarked");
        assert_eq!(embarked.x_label, "embarked");
        assert_eq!(embarked.x_tick_rotation, 45.0);
    }

    #[test]
    fn test_density_series_share_edges_and_integrate() {
        let config = PlotConfig::builder()
            .bin_strategy(BinStrategy::Fixed(4))
            .build()
            .unwrap();
        let grid = DistributionPlotter::new(config)
            .unwrap()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        let Chart::Density { edges, series } = &grid.subplot("fare").unwrap().chart else {
            panic!("fare should be a density chart");
        };
        assert_eq!(edges.len(), 5);
        assert_eq!(series.len(), 2);
        for s in series {
            assert_eq!(s.densities.len(), 4);
            let area: f64 = s
                .densities
                .iter()
                .zip(edges.windows(2))
                .map(|(d, e)| d * (e[1] - e[0]))
                .sum();
            assert!((area - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_infinite_values_leave_densities_finite() {
        let df = df![
            "x" => [1.0, 2.0, f64::INFINITY, 3.0],
            "label" => ["a", "b", "a", "b"],
        ]
        .unwrap();
        let grid = DistributionPlotter::default().build_grid(&df, "label").unwrap();

        let Chart::Density { edges, series } = &grid.subplot("x").unwrap().chart else {
            panic!("x should be a density chart");
        };
        assert!(edges.iter().all(|e| e.is_finite()));
        assert_eq!(edges.first(), Some(&1.0));
        assert_eq!(edges.last(), Some(&3.0));
        assert_eq!(series[0].count, 1);
        assert_eq!(series[1].count, 2);
        for s in series {
            let area: f64 = s
                .densities
                .iter()
                .zip(edges.windows(2))
                .map(|(d, e)| d * (e[1] - e[0]))
                .sum();
            assert!((area - 1.0).abs() < 1e-9, "class {}", s.class);
        }

        // Infinity is a value, not a missing entry
        assert_eq!(grid.subplot("x").unwrap().missing_by_class[0].missing_count, 0);
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let config = PlotConfig {
            grid_columns: 10_000_000,
            ..PlotConfig::default()
        };
        let err = DistributionPlotter::new(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_enum_column_is_plotted_as_proportions() {
        let categories = FrozenCategories::new(["S", "C", "Q"]).unwrap();
        let embarked = Series::new("embarked".into(), &[Some("S"), Some("C"), Some("S"), None])
            .cast(&DataType::from_frozen_categories(categories))
            .unwrap();
        let label = Series::new("label".into(), &["a", "a", "b", "b"]);
        let df = DataFrame::new(vec![embarked.into(), label.into()]).unwrap();

        let grid = DistributionPlotter::default().build_grid(&df, "label").unwrap();
        let subplot = grid.subplot("embarked").unwrap();

        assert_eq!(subplot.kind, ColumnKind::Categorical);
        let Chart::Proportion { series, .. } = &subplot.chart else {
            panic!("embarked should be a proportion chart");
        };
        for s in series {
            assert!((s.total() - 1.0).abs() < 1e-9);
        }
        assert!((subplot.missing_by_class[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_duration_column_is_unsupported() {
        let wait = Series::new("wait".into(), &[1_000i64, 2_000])
            .cast(&DataType::Duration(TimeUnit::Milliseconds))
            .unwrap();
        let label = Series::new("label".into(), &["a", "b"]);
        let df = DataFrame::new(vec![wait.into(), label.into()]).unwrap();

        let err = DistributionPlotter::default()
            .build_grid(&df, "label")
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
    }

    #[test]
    fn test_categorical_proportions_sum_to_one() {
        let grid = DistributionPlotter::default()
            .build_grid(&mixed_df(), "survived")
            .unwrap();

        let Chart::Proportion { series, .. } = &grid.subplot("embarked").unwrap().chart else {
            panic!("embarked should be a proportion chart");
        };
        for s in series {
            assert!((s.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_numeric_target_classes() {
        let grid = DistributionPlotter::default()
            .build_grid(&mixed_df(), "survived")
            .unwrap();
        assert_eq!(grid.classes, vec!["0".to_string(), "1".to_string()]);

        let age = grid.subplot("age").unwrap();
        let survived = age.missing_by_class.iter().find(|m| m.class == "1").unwrap();
        assert_eq!(survived.rows, 3);
        assert_eq!(survived.missing_count, 1);
    }

    #[test]
    fn test_single_class_target_proceeds() {
        let df = df![
            "x" => [1.0, 2.0, 3.0],
            "label" => [Some("a"), None, Some("a")],
        ]
        .unwrap();

        let grid = DistributionPlotter::default().build_grid(&df, "label").unwrap();
        assert_eq!(grid.classes, vec!["a".to_string()]);
        assert_eq!(grid.subplots.len(), 1);
    }

    #[test]
    fn test_all_missing_column_proceeds() {
        let df = df![
            "empty_num" => [None::<f64>, None, None],
            "empty_text" => [None::<&str>, None, None],
            "label" => ["a", "b", "a"],
        ]
        .unwrap();

        let grid = DistributionPlotter::default().build_grid(&df, "label").unwrap();
        let empty = grid.subplot("empty_num").unwrap();
        assert_eq!(
            empty.annotation_lines(),
            vec!["a Missing: 100.00%", "b Missing: 100.00%"]
        );
        let Chart::Density { edges, .. } = &empty.chart else {
            panic!("expected a density chart");
        };
        assert!(edges.is_empty());
    }

    #[test]
    fn test_unknown_target_column() {
        let err = DistributionPlotter::default()
            .build_grid(&age_label_df(), "missing")
            .unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "missing"));
    }

    #[test]
    fn test_only_target_column() {
        let df = df!["label" => ["a", "b"]].unwrap();
        let err = DistributionPlotter::default()
            .build_grid(&df, "label")
            .unwrap_err();
        assert!(matches!(err, EdaError::NoPlottableColumns(_)));
    }

    #[test]
    fn test_unsupported_column_type() {
        let inner = Series::new("".into(), &[1i64, 2]);
        let tags = Series::new("tags".into(), &[inner.clone(), inner]);
        let label = Series::new("label".into(), &["a", "b"]);
        let df = DataFrame::new(vec![tags.into(), label.into()]).unwrap();

        let err = DistributionPlotter::default()
            .build_grid(&df, "label")
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_COLUMN_TYPE");
    }

    #[test]
    fn test_nan_target_is_not_a_class() {
        let df = df![
            "x" => ["a", "b", "c"],
            "score" => [1.0, f64::NAN, 1.0],
        ]
        .unwrap();

        let grid = DistributionPlotter::default().build_grid(&df, "score").unwrap();
        assert_eq!(grid.classes.len(), 1);
    }
}
