//! Configuration types for the distribution plotter.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic plotter setup.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Diverging color palette used to distinguish target classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Palette {
    /// Dark blue through white to dark red
    #[default]
    Seismic,
    /// Blue through white to red
    Bwr,
}

impl FromStr for Palette {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seismic" => Ok(Palette::Seismic),
            "bwr" => Ok(Palette::Bwr),
            other => Err(ConfigValidationError::UnknownPalette(other.to_string())),
        }
    }
}

/// Strategy for choosing histogram bins on numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BinStrategy {
    /// The narrower of the Sturges and Freedman-Diaconis bin widths
    #[default]
    Auto,
    /// Sturges' rule: `log2(n) + 1` bins over the data range
    Sturges,
    /// Freedman-Diaconis rule: bin width `2 * IQR * n^(-1/3)`
    FreedmanDiaconis,
    /// A fixed number of equal-width bins
    Fixed(usize),
}

impl FromStr for BinStrategy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BinStrategy::Auto),
            "sturges" => Ok(BinStrategy::Sturges),
            "fd" | "freedman-diaconis" => Ok(BinStrategy::FreedmanDiaconis),
            other => other
                .parse::<usize>()
                .map(BinStrategy::Fixed)
                .map_err(|_| ConfigValidationError::UnknownBinStrategy(other.to_string())),
        }
    }
}

/// Configuration for the distribution plotter.
///
/// Use [`PlotConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::config::{BinStrategy, Palette, PlotConfig};
///
/// let config = PlotConfig::builder()
///     .grid_columns(3)
///     .palette(Palette::Bwr)
///     .bin_strategy(BinStrategy::Fixed(20))
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Number of subplots per grid row.
    /// Default: 4
    pub grid_columns: usize,

    /// Palette used to color target classes.
    /// Default: Seismic
    pub palette: Palette,

    /// Histogram bin selection for numeric columns.
    /// Default: Auto
    pub bin_strategy: BinStrategy,

    /// Opacity of histogram fills (0.0 - 1.0).
    /// Default: 0.5
    pub alpha: f64,

    /// Width of one grid cell in pixels.
    /// Default: 500
    pub cell_width: u32,

    /// Height of one grid cell in pixels.
    /// Default: 500
    pub cell_height: u32,

    /// Category labels longer than this are truncated for display.
    /// Default: 10
    pub max_label_chars: usize,

    /// Rotation of categorical x tick labels in degrees.
    /// Default: 45.0
    pub x_tick_rotation: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            grid_columns: 4,
            palette: Palette::default(),
            bin_strategy: BinStrategy::default(),
            alpha: 0.5,
            cell_width: 500,
            cell_height: 500,
            max_label_chars: 10,
            x_tick_rotation: 45.0,
        }
    }
}

/// Smallest accepted cell edge in pixels.
pub const MIN_CELL_SIZE: u32 = 100;

/// Widest accepted grid, in subplots per row.
pub const MAX_GRID_COLUMNS: usize = 64;

impl PlotConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PlotConfigBuilder {
        PlotConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.grid_columns == 0 || self.grid_columns > MAX_GRID_COLUMNS {
            return Err(ConfigValidationError::InvalidGridColumns(self.grid_columns));
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigValidationError::InvalidAlpha(self.alpha));
        }

        if self.cell_width < MIN_CELL_SIZE || self.cell_height < MIN_CELL_SIZE {
            return Err(ConfigValidationError::InvalidCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }

        if self.max_label_chars == 0 {
            return Err(ConfigValidationError::InvalidLabelLength(
                self.max_label_chars,
            ));
        }

        if self.bin_strategy == BinStrategy::Fixed(0) {
            return Err(ConfigValidationError::InvalidBinCount(0));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid grid columns: {0} (must be between 1 and 64)")]
    InvalidGridColumns(usize),

    #[error("Invalid alpha: {0} (must be between 0.0 and 1.0)")]
    InvalidAlpha(f64),

    #[error("Invalid cell size: {width}x{height} (each side must be at least 100 px)")]
    InvalidCellSize { width: u32, height: u32 },

    #[error("Invalid label length: {0} (must be at least 1)")]
    InvalidLabelLength(usize),

    #[error("Invalid bin count: {0} (must be at least 1)")]
    InvalidBinCount(usize),

    #[error("Unknown palette '{0}' (expected 'seismic' or 'bwr')")]
    UnknownPalette(String),

    #[error("Unknown bin strategy '{0}' (expected 'auto', 'sturges', 'fd' or a bin count)")]
    UnknownBinStrategy(String),
}

/// Builder for [`PlotConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PlotConfigBuilder {
    grid_columns: Option<usize>,
    palette: Option<Palette>,
    bin_strategy: Option<BinStrategy>,
    alpha: Option<f64>,
    cell_width: Option<u32>,
    cell_height: Option<u32>,
    max_label_chars: Option<usize>,
    x_tick_rotation: Option<f64>,
}

impl PlotConfigBuilder {
    /// Set the number of subplots per grid row.
    pub fn grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = Some(columns);
        self
    }

    /// Set the class color palette.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Set the histogram bin strategy.
    pub fn bin_strategy(mut self, strategy: BinStrategy) -> Self {
        self.bin_strategy = Some(strategy);
        self
    }

    /// Set the histogram fill opacity.
    ///
    /// # Arguments
    /// * `alpha` - Value between 0.0 (invisible) and 1.0 (opaque)
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Set the pixel size of one grid cell.
    pub fn cell_size(mut self, width: u32, height: u32) -> Self {
        self.cell_width = Some(width);
        self.cell_height = Some(height);
        self
    }

    /// Set the maximum displayed length of category labels.
    pub fn max_label_chars(mut self, chars: usize) -> Self {
        self.max_label_chars = Some(chars);
        self
    }

    /// Set the rotation of categorical x tick labels.
    pub fn x_tick_rotation(mut self, degrees: f64) -> Self {
        self.x_tick_rotation = Some(degrees);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PlotConfig` or an error if validation fails.
    pub fn build(self) -> Result<PlotConfig, ConfigValidationError> {
        let defaults = PlotConfig::default();
        let config = PlotConfig {
            grid_columns: self.grid_columns.unwrap_or(defaults.grid_columns),
            palette: self.palette.unwrap_or_default(),
            bin_strategy: self.bin_strategy.unwrap_or_default(),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            cell_width: self.cell_width.unwrap_or(defaults.cell_width),
            cell_height: self.cell_height.unwrap_or(defaults.cell_height),
            max_label_chars: self.max_label_chars.unwrap_or(defaults.max_label_chars),
            x_tick_rotation: self.x_tick_rotation.unwrap_or(defaults.x_tick_rotation),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlotConfig::default();
        assert_eq!(config.grid_columns, 4);
        assert_eq!(config.palette, Palette::Seismic);
        assert_eq!(config.bin_strategy, BinStrategy::Auto);
        assert_eq!(config.max_label_chars, 10);
        assert_eq!(config.alpha, 0.5);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = PlotConfig::builder().build().unwrap();
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PlotConfig::builder()
            .grid_columns(3)
            .palette(Palette::Bwr)
            .bin_strategy(BinStrategy::Fixed(12))
            .alpha(0.3)
            .cell_size(400, 300)
            .build()
            .unwrap();

        assert_eq!(config.grid_columns, 3);
        assert_eq!(config.palette, Palette::Bwr);
        assert_eq!(config.bin_strategy, BinStrategy::Fixed(12));
        assert_eq!(config.alpha, 0.3);
        assert_eq!((config.cell_width, config.cell_height), (400, 300));
    }

    #[test]
    fn test_validation_zero_grid_columns() {
        let result = PlotConfig::builder().grid_columns(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidGridColumns(0)
        ));
    }

    #[test]
    fn test_validation_too_many_grid_columns() {
        let result = PlotConfig::builder().grid_columns(10_000_000).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidGridColumns(10_000_000)
        ));

        let widest = PlotConfig::builder()
            .grid_columns(MAX_GRID_COLUMNS)
            .build()
            .unwrap();
        assert_eq!(widest.grid_columns, MAX_GRID_COLUMNS);
    }

    #[test]
    fn test_validation_alpha_out_of_range() {
        let result = PlotConfig::builder().alpha(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidAlpha(_)
        ));
    }

    #[test]
    fn test_validation_tiny_cells() {
        let result = PlotConfig::builder().cell_size(50, 500).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCellSize { .. }
        ));
    }

    #[test]
    fn test_validation_zero_fixed_bins() {
        let result = PlotConfig::builder()
            .bin_strategy(BinStrategy::Fixed(0))
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidBinCount(0)
        ));
    }

    #[test]
    fn test_parse_bin_strategy() {
        assert_eq!("auto".parse::<BinStrategy>().unwrap(), BinStrategy::Auto);
        assert_eq!("FD".parse::<BinStrategy>().unwrap(), BinStrategy::FreedmanDiaconis);
        assert_eq!("25".parse::<BinStrategy>().unwrap(), BinStrategy::Fixed(25));
        assert!("many".parse::<BinStrategy>().is_err());
    }

    #[test]
    fn test_parse_palette() {
        assert_eq!("Seismic".parse::<Palette>().unwrap(), Palette::Seismic);
        assert_eq!("bwr".parse::<Palette>().unwrap(), Palette::Bwr);
        assert!("viridis".parse::<Palette>().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "grid_columns": 2,
            "palette": "Bwr",
            "bin_strategy": { "Fixed": 8 },
            "alpha": 0.25,
            "cell_width": 300,
            "cell_height": 200,
            "max_label_chars": 6,
            "x_tick_rotation": 90.0
        }"#;

        let config: PlotConfig = serde_json::from_str(json).expect("Should deserialize");

        assert_eq!(config.grid_columns, 2);
        assert_eq!(config.palette, Palette::Bwr);
        assert_eq!(config.bin_strategy, BinStrategy::Fixed(8));
        assert_eq!(config.max_label_chars, 6);
        assert!(config.validate().is_ok());
    }
}
