//! Exploratory Data Analysis Helpers
//!
//! Two small routines for getting a first look at a tabular dataset loaded
//! with Polars.
//!
//! # Overview
//!
//! - **Missing Summary**: percentage of missing values per column, sorted
//!   from most to least incomplete
//! - **Distribution Plots**: one subplot per column, stratified by a
//!   binary/categorical target, annotated with per-class missing rates
//!
//! Nulls are missing everywhere; in float columns NaN is missing as well.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::{compute_missing_summary, plot_distributions_by_target};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .try_into_reader_with_file_path(Some("train.csv".into()))?
//!     .finish()?;
//!
//! // Most incomplete columns first
//! let summary = compute_missing_summary(&df)?;
//! for entry in &summary {
//!     println!("{:<20} {:>6.2}%", entry.column, entry.percentage);
//! }
//!
//! // Histograms and proportion bars split by the target classes
//! let figure = plot_distributions_by_target(&df, "Survived")?;
//! println!("{} subplots", figure.grid.subplots.len());
//! let svg: &str = &figure.svg;
//! ```
//!
//! # Configuration
//!
//! Use [`PlotConfig`] to change the grid width, palette or binning:
//!
//! ```rust,ignore
//! use lex_eda::{BinStrategy, DistributionPlotter, Palette, PlotConfig};
//!
//! let config = PlotConfig::builder()
//!     .grid_columns(3)
//!     .palette(Palette::Bwr)
//!     .bin_strategy(BinStrategy::Fixed(30))
//!     .build()?;
//!
//! let grid = DistributionPlotter::new(config)?.build_grid(&df, "Survived")?;
//! ```

pub mod config;
pub mod error;
pub mod missing;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{BinStrategy, ConfigValidationError, Palette, PlotConfig, PlotConfigBuilder};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use missing::{MissingValueAnalyzer, compute_missing_summary};
pub use plotting::{DistributionPlotter, RenderedFigure, plot_distributions_by_target, render_svg};
pub use types::{
    Chart, ClassMissing, DensitySeries, MissingEntry, MissingSummary, PlotGrid, ProportionSeries,
    Subplot,
};
pub use utils::{ColumnKind, DtypeCategory, classify_column, get_dtype_category, missing_count};
