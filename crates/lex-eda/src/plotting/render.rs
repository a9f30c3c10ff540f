//! SVG rendering of a [`PlotGrid`] with `plotters`.
//!
//! The figure is drawn into an in-memory string. Hidden cells are left
//! blank instead of getting empty axes.

use crate::config::PlotConfig;
use crate::error::{EdaError, Result};
use crate::types::{Chart, DensitySeries, PlotGrid, ProportionSeries, Subplot};
use plotters::coord::Shift;
use plotters::prelude::*;

type Cell<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Background of the missing-value annotation box.
const WHEAT: RGBColor = RGBColor(245, 222, 179);

/// Share of a category slot occupied by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

const FONT: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(err: E) -> EdaError {
    EdaError::Render(err.to_string())
}

/// Draw the whole grid as an SVG document.
///
/// The canvas is `ncols * cell_width` by `nrows * cell_height` pixels.
pub fn render_svg(grid: &PlotGrid, config: &PlotConfig) -> Result<String> {
    let width = canvas_edge(config.cell_width, grid.ncols)?;
    let height = canvas_edge(config.cell_height, grid.nrows.max(1))?;
    let colors = config.palette.sample(grid.classes.len());

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let cells = root.split_evenly((grid.nrows.max(1), grid.ncols));
        for subplot in &grid.subplots {
            let cell = cells.get(subplot.index).ok_or_else(|| {
                EdaError::Render(format!(
                    "subplot {} does not fit a {}x{} grid",
                    subplot.index, grid.nrows, grid.ncols
                ))
            })?;

            match &subplot.chart {
                Chart::Density { edges, series } => {
                    draw_density(cell, subplot, edges, series, &colors, config)?
                }
                Chart::Proportion { categories, series } => {
                    draw_proportions(cell, subplot, categories, series, &colors)?
                }
            }
        }

        root.present().map_err(render_err)?;
    }

    Ok(svg)
}

/// Pixel length of `cells` cells of `cell` pixels each.
fn canvas_edge(cell: u32, cells: usize) -> Result<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|n| cell.checked_mul(n))
        .ok_or_else(|| {
            EdaError::Render(format!(
                "canvas of {} cells of {} px does not fit in u32 pixels",
                cells, cell
            ))
        })
}

fn draw_density(
    cell: &Cell<'_>,
    subplot: &Subplot,
    edges: &[f64],
    series: &[DensitySeries],
    colors: &[RGBColor],
    config: &PlotConfig,
) -> Result<()> {
    let x_range = match (edges.first(), edges.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => lo..hi,
        _ => 0.0..1.0,
    };
    let y_max = series
        .iter()
        .flat_map(|s| s.densities.iter().copied())
        .fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(cell)
        .caption(&subplot.title, (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, 0.0..y_top)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(subplot.x_label.as_str())
        .y_desc(subplot.y_label.as_str())
        .label_style((FONT, 12))
        .draw()
        .map_err(render_err)?;

    if edges.len() >= 2 {
        let alpha = config.alpha;
        for (s, &color) in series.iter().zip(colors) {
            let outline = step_outline(edges, &s.densities);
            chart
                .draw_series(std::iter::once(Polygon::new(
                    outline.clone(),
                    color.mix(alpha).filled(),
                )))
                .map_err(render_err)?
                .label(s.class.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(alpha).filled())
                });
            chart
                .draw_series(std::iter::once(PathElement::new(
                    outline,
                    color.stroke_width(1),
                )))
                .map_err(render_err)?;
        }
    }

    if subplot.show_legend && !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 12))
            .draw()
            .map_err(render_err)?;
    }

    draw_annotation(&chart.plotting_area().strip_coord_spec(), subplot)
}

fn draw_proportions(
    cell: &Cell<'_>,
    subplot: &Subplot,
    categories: &[String],
    series: &[ProportionSeries],
    colors: &[RGBColor],
) -> Result<()> {
    let slots = categories.len().max(1);
    let y_max = series
        .iter()
        .flat_map(|s| s.proportions.iter().copied())
        .fold(0.0, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(cell)
        .caption(&subplot.title, (FONT, 20))
        .margin(10)
        .x_label_area_size(90)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.5..(slots as f64 - 0.5), 0.0..y_top)
        .map_err(render_err)?;

    // plotters only rotates text by quarter turns
    let rotation = if subplot.x_tick_rotation.abs() >= 45.0 {
        FontTransform::Rotate90
    } else {
        FontTransform::None
    };
    let tick_label = |x: &f64| {
        let slot = x.round();
        if (x - slot).abs() < 1e-6 && slot >= 0.0 {
            categories.get(slot as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots + 1)
        .x_label_formatter(&tick_label)
        .x_label_style((FONT, 12).into_font().transform(rotation))
        .y_label_style((FONT, 12))
        .x_desc(subplot.x_label.as_str())
        .y_desc(subplot.y_label.as_str())
        .draw()
        .map_err(render_err)?;

    let bar_width = GROUP_WIDTH / series.len().max(1) as f64;
    for (j, (s, &color)) in series.iter().zip(colors).enumerate() {
        let offset = -GROUP_WIDTH / 2.0 + j as f64 * bar_width;
        chart
            .draw_series(s.proportions.iter().enumerate().map(|(i, &p)| {
                let x0 = i as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, p)], color.filled())
            }))
            .map_err(render_err)?
            .label(s.class.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if subplot.show_legend && !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 12))
            .draw()
            .map_err(render_err)?;
    }

    draw_annotation(&chart.plotting_area().strip_coord_spec(), subplot)
}

/// Outline of a step histogram, closed along the x axis.
fn step_outline(edges: &[f64], densities: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(densities.len() * 2 + 2);
    points.push((edges[0], 0.0));
    for (edge, &density) in edges.windows(2).zip(densities) {
        points.push((edge[0], density));
        points.push((edge[1], density));
    }
    points.push((edges[edges.len() - 1], 0.0));
    points
}

/// Per-class missing rates in a translucent box at the upper left.
fn draw_annotation(area: &Cell<'_>, subplot: &Subplot) -> Result<()> {
    let lines = subplot.annotation_lines();
    if lines.is_empty() {
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let x = (f64::from(width) * 0.05) as i32;
    let y = (f64::from(height) * 0.05) as i32;
    let line_height = 15;
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let box_width = widest * 7 + 12;
    let box_height = lines.len() as i32 * line_height + 8;

    area.draw(&Rectangle::new(
        [(x, y), (x + box_width, y + box_height)],
        WHEAT.mix(0.5).filled(),
    ))
    .map_err(render_err)?;

    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.as_str(),
            (x + 6, y + 4 + i as i32 * line_height),
            (FONT, 12).into_font(),
        ))
        .map_err(render_err)?;
    }

    Ok(())
}
