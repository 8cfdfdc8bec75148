// src/plot_framework.rs

use ndarray::Array2;
use ndarray_stats::QuantileExt;
use plotters::backend::BitMapBackend;
use plotters::chart::ChartBuilder;
use plotters::drawing::DrawingArea;
use plotters::element::{Circle, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};
use std::error::Error;
use std::ops::Range;

use crate::constants::LINE_WIDTH_PLOT;

const FONT_SIZE_CHART_TITLE: i32 = 20;
const FONT_SIZE_AXIS_LABEL: i32 = 14;

/// A single labeled line on a chart.
#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// Calculate plot range with padding.
/// Adds 10% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.10 };
    (min - padding, max + padding)
}

/// Maps a cell value onto the viridis ramp over `[min_val, max_val]`.
pub fn map_value_to_color(value: f64, min_val: f64, max_val: f64) -> RGBColor {
    if !value.is_finite() || !min_val.is_finite() || !max_val.is_finite() {
        return RGBColor(0, 0, 0);
    }
    let span = (max_val - min_val).abs().max(1e-9);
    let t = ((value.clamp(min_val, max_val) - min_val) / span).clamp(0.0, 1.0);
    let color = colorous::VIRIDIS.eval_continuous(t);
    RGBColor(color.r, color.g, color.b)
}

/// Draws a line chart with optional point markers on one drawing area.
pub fn draw_line_chart(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    series: &[PlotSeries],
    markers: &[(f64, f64)],
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(10)
        .y_labels(8)
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    for s in series {
        chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            s.color.stroke_width(s.stroke_width),
        ))?;
    }

    for &(x, y) in markers {
        chart.draw_series(std::iter::once(Circle::new(
            (x, y),
            3,
            plotters::style::colors::RED.filled(),
        )))?;
    }

    Ok(())
}

/// Cell edges for a bin-center axis: midpoints between neighbors, with
/// the first and last edges extrapolated by half the adjacent gap.
fn bin_edges(centers: &[f64]) -> Vec<f64> {
    match centers.len() {
        0 => Vec::new(),
        1 => {
            let c = centers[0];
            vec![c - 0.5, c + 0.5]
        }
        n => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
            for w in centers.windows(2) {
                edges.push((w[0] + w[1]) / 2.0);
            }
            edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
            edges
        }
    }
}

/// Draws a heatmap of `values` (shape `(y_bins, x_bins)`) as one filled
/// rectangle per cell, colored over `[min_val, max_val]`. Order lines
/// in `lines` (order number plus endpoints, chart coordinates) are
/// drawn on top with their order number annotated at the far end.
#[allow(clippy::too_many_arguments)]
pub fn draw_heatmap_chart(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    x_label: &str,
    y_label: &str,
    x_bins: &[f64],
    y_bins: &[f64],
    values: &Array2<f64>,
    value_range: (f64, f64),
    y_view: Range<f64>,
    lines: &[(f64, [(f64, f64); 2])],
    line_stroke: u32,
) -> Result<(), Box<dyn Error>> {
    if x_bins.is_empty() || y_bins.is_empty() {
        return Ok(());
    }
    let x_edges = bin_edges(x_bins);
    let y_edges = bin_edges(y_bins);
    let x_view = x_edges[0]..x_edges[x_edges.len() - 1];

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_view.clone(), y_view.clone())?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(10)
        .y_labels(8)
        .disable_mesh()
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let (min_val, max_val) = value_range;
    for x_idx in 0..x_bins.len() {
        for y_idx in 0..y_bins.len() {
            let color = map_value_to_color(values[[y_idx, x_idx]], min_val, max_val);
            let rect = Rectangle::new(
                [
                    (x_edges[x_idx], y_edges[y_idx]),
                    (x_edges[x_idx + 1], y_edges[y_idx + 1]),
                ],
                color.filled(),
            );
            chart.draw_series(std::iter::once(rect))?;
        }
    }

    for &(order, [start, end]) in lines {
        let Some((start, end)) = clip_segment(start, end, &x_view, &y_view) else {
            continue;
        };
        chart.draw_series(LineSeries::new(
            vec![start, end],
            WHITE.mix(0.75).stroke_width(line_stroke),
        ))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{order:.1}"),
            end,
            ("sans-serif", FONT_SIZE_AXIS_LABEL).into_font().color(&BLACK),
        )))?;
    }

    Ok(())
}

/// Clips a segment to a view rectangle (Liang-Barsky). `None` when the
/// segment lies entirely outside. Series are not clipped by the chart
/// itself, so anything drawn must be cut to the view first.
fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    x_view: &Range<f64>,
    y_view: &Range<f64>,
) -> Option<((f64, f64), (f64, f64))> {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t_enter = 0.0f64;
    let mut t_exit = 1.0f64;
    for (p, q) in [
        (-dx, start.0 - x_view.start),
        (dx, x_view.end - start.0),
        (-dy, start.1 - y_view.start),
        (dy, y_view.end - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
    }
    if t_enter > t_exit {
        return None;
    }
    let at = |t: f64| (start.0 + t * dx, start.1 + t * dy);
    Some((at(t_enter), at(t_exit)))
}

/// Min/max of a matrix (NaN cells skipped), with a fallback when the
/// extremes are not finite.
pub fn finite_value_range(values: &Array2<f64>, fallback: (f64, f64)) -> (f64, f64) {
    if values.is_empty() {
        return fallback;
    }
    let min = *values.min_skipnan();
    let max = *values.max_skipnan();
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        fallback
    }
}

/// Default line width for data series.
pub fn default_stroke() -> u32 {
    LINE_WIDTH_PLOT
}
