//! CLI entry point for the exploratory data analysis helpers.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lex_eda::{
    BinStrategy, DistributionPlotter, MissingSummary, Palette, PlotConfig, RenderedFigure,
    compute_missing_summary,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible palette enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPalette {
    /// Dark blue through white to dark red
    Seismic,
    /// Blue through white to red
    Bwr,
}

impl From<CliPalette> for Palette {
    fn from(cli: CliPalette) -> Self {
        match cli {
            CliPalette::Seismic => Palette::Seismic,
            CliPalette::Bwr => Palette::Bwr,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Exploratory data analysis helpers",
    long_about = "Summarize missing values and plot per-column distributions split by a target.\n\n\
                  EXAMPLES:\n  \
                  # Missing value table, most incomplete columns first\n  \
                  lex-eda missing -i data.csv\n\n  \
                  # Same summary as JSON\n  \
                  lex-eda missing -i data.csv --json\n\n  \
                  # Distribution grid split by the target column\n  \
                  lex-eda plot -i data.csv -t Survived -o plots.svg\n\n  \
                  # Narrower grid with fixed bins and the grid layout as JSON\n  \
                  lex-eda plot -i data.csv -t Survived -o plots.svg --grid-columns 3 --bins 30 --emit-layout layout.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the percentage of missing values per column
    Missing(MissingArgs),
    /// Render per-column distributions stratified by a target column
    Plot(PlotArgs),
}

#[derive(Args, Debug)]
struct MissingArgs {
    /// Path to the CSV or Parquet file
    #[arg(short, long)]
    input: String,

    /// Output JSON to stdout instead of a table
    ///
    /// Disables all progress logs so the output can be piped:
    /// `... --json | jq '.entries[0]'`
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Path to the CSV or Parquet file
    #[arg(short, long)]
    input: String,

    /// Column whose classes stratify the plots
    #[arg(short, long)]
    target: String,

    /// Path of the SVG file to write
    #[arg(short, long, default_value = "distributions.svg")]
    output: String,

    /// Number of subplots per grid row
    #[arg(long, default_value = "4")]
    grid_columns: usize,

    /// Class color palette
    #[arg(long, value_enum, default_value = "seismic")]
    palette: CliPalette,

    /// Histogram binning: auto, sturges, fd, or a fixed bin count
    #[arg(long, default_value = "auto")]
    bins: String,

    /// Width and height of each subplot in pixels
    #[arg(long, default_value = "500")]
    cell_size: u32,

    /// Also write the grid model (classes, bins, proportions, missing rates) as JSON
    #[arg(long)]
    emit_layout: Option<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = matches!(&cli.command, Command::Missing(args) if args.json);
    init_logging(&cli.log_level, cli.quiet, json_output);

    match &cli.command {
        Command::Missing(args) => run_missing(args),
        Command::Plot(args) => run_plot(args, cli.quiet),
    }
}

/// Compute and print the missing value summary.
fn run_missing(args: &MissingArgs) -> Result<()> {
    let data = load_dataset(&args.input)?;
    let summary = compute_missing_summary(&data)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_missing_table(&args.input, &summary);
    Ok(())
}

/// Build, render and write the distribution grid.
fn run_plot(args: &PlotArgs, quiet: bool) -> Result<()> {
    let bins: BinStrategy = args.bins.parse()?;
    let config = PlotConfig::builder()
        .grid_columns(args.grid_columns)
        .palette(args.palette.into())
        .bin_strategy(bins)
        .cell_size(args.cell_size, args.cell_size)
        .build()?;

    let data = load_dataset(&args.input)?;
    let plotter = DistributionPlotter::new(config)?;
    let figure = plotter.plot(&data, &args.target)?;

    write_output(&args.output, &figure.svg)?;
    info!("Plot written to: {}", args.output);

    if let Some(ref layout_path) = args.emit_layout {
        write_output(layout_path, &serde_json::to_string_pretty(&figure.grid)?)?;
        info!("Layout written to: {}", layout_path);
    }

    if !quiet {
        print_plot_summary(args, &figure);
    }
    Ok(())
}

/// Print the summary as an aligned table.
///
/// Uses `println!` rather than logging since the table is the command's output.
fn print_missing_table(input: &str, summary: &MissingSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("MISSING VALUES: {} ({} rows)", input, summary.total_rows);
    println!("{}", "=".repeat(60));
    println!("{:<30} {:>12} {:>12}", "Column", "Missing", "Missing %");
    println!("{}", "-".repeat(60));

    for entry in summary {
        println!(
            "{:<30} {:>12} {:>11.2}%",
            truncate_str(&entry.column, 29),
            entry.missing_count,
            entry.percentage
        );
    }

    println!("{}", "-".repeat(60));
    println!(
        "{} of {} columns have missing values",
        summary.columns_with_missing().count(),
        summary.len()
    );
    println!("Use --json for machine-readable output");
}

/// Print where the figure went and the per-class missing rates it annotates.
fn print_plot_summary(args: &PlotArgs, figure: &RenderedFigure) {
    let grid = &figure.grid;

    println!();
    println!(
        "Target: {} (classes: {})",
        grid.target_column,
        grid.classes.join(", ")
    );
    println!(
        "Grid: {} subplots in {} rows x {} columns",
        grid.subplots.len(),
        grid.nrows,
        grid.ncols
    );
    println!("Output: {}", args.output);
    if let Some(ref layout) = args.emit_layout {
        println!("Layout: {}", layout);
    }
    println!();

    for subplot in &grid.subplots {
        let missing = subplot.annotation_lines().join(", ");
        println!("  {:<24} {}", truncate_str(&subplot.column, 23), missing);
    }
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write a text artifact, creating the parent directory if needed.
fn write_output(path: &str, contents: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
        debug!("Created output directory: {}", parent.display());
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path))
}

/// Load a dataset, choosing the reader from the file extension.
fn load_dataset(path: &str) -> Result<DataFrame> {
    if !Path::new(path).exists() {
        return Err(anyhow!("Input file not found: {}", path));
    }

    info!("Loading dataset from: {}", path);
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let data = match extension.as_deref() {
        Some("parquet") | Some("pq") => ParquetReader::new(File::open(path)?).finish()?,
        _ => load_csv_with_fallbacks(path)?,
    };

    info!("Dataset loaded successfully: {:?}", data.shape());
    Ok(data)
}

/// Load CSV, retrying without quote handling when the first parse fails
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Failed to read {}: {}", path, e))
}
