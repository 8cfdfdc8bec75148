// src/plot_functions/plot_waterfall.rs

use std::path::Path;

use plotters::drawing::IntoDrawingArea;
use plotters::prelude::BitMapBackend;
use plotters::style::colors::full_palette::{BLUE, ORANGE};
use plotters::style::colors::WHITE;

use crate::constants::{
    LINE_WIDTH_ORDER_LINE, PLOT_HEIGHT, PLOT_WIDTH, WATERFALL_MAX_DB, WATERFALL_MIN_DB,
};
use crate::error::AnalysisError;
use crate::plot_framework::{
    calculate_range, default_stroke, draw_heatmap_chart, draw_line_chart, finite_value_range,
    PlotSeries,
};
use crate::signal_analysis::orders::frequency_range_indices;
use crate::signal_analysis::units::SpeedUnit;
use crate::signal_analysis::waterfall::WaterfallData;

/// Renders a waterfall figure from computed analysis data.
///
/// Without an input-speed signal the figure stacks the response trace
/// over a time/frequency heatmap. With one, it stacks the response
/// trace, the input-speed trace, and a speed/frequency heatmap with the
/// requested order lines overlaid. Purely a consumer of the arrays in
/// `WaterfallData`; no computation happens here.
pub fn plot_waterfall(
    time: &[f64],
    data: &WaterfallData,
    unit: SpeedUnit,
    f_range: Option<(f64, f64)>,
    title: &str,
    output_path: &Path,
) -> Result<(), AnalysisError> {
    let render = || -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let rows = if data.speed_trace_hz.is_some() { 3 } else { 2 };
        let areas = root.split_evenly((rows, 1));

        // Response trace, with cleaned samples marked.
        let signal_points: Vec<(f64, f64)> = time
            .iter()
            .zip(data.signal.iter())
            .map(|(&t, &v)| (t, v))
            .collect();
        let markers: Vec<(f64, f64)> = data
            .removed_indices
            .iter()
            .map(|&i| (time[i], data.signal[i]))
            .collect();
        let (y_lo, y_hi) = calculate_range(
            data.signal.iter().cloned().fold(f64::INFINITY, f64::min),
            data.signal.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        );
        draw_line_chart(
            &areas[0],
            title,
            "Time (s)",
            "Response",
            time[0]..time[time.len() - 1],
            y_lo..y_hi,
            &[PlotSeries {
                data: signal_points,
                label: String::new(),
                color: BLUE,
                stroke_width: default_stroke(),
            }],
            &markers,
        )?;

        let spec = &data.spectrogram;
        let value_range = finite_value_range(&spec.matrix, (WATERFALL_MIN_DB, WATERFALL_MAX_DB));

        match (&data.speed_trace_hz, &data.speed_bins_hz) {
            (Some(trace_hz), Some(bins_hz)) => {
                // Input-speed trace in display units.
                let to_display = 1.0 / unit.to_hz_factor();
                let speed_points: Vec<(f64, f64)> = time
                    .iter()
                    .zip(trace_hz.iter())
                    .map(|(&t, &v)| (t, v * to_display))
                    .collect();
                let speed_max = speed_points.iter().fold(0.0f64, |m, p| m.max(p.1));
                draw_line_chart(
                    &areas[1],
                    "Input Speed",
                    "Time (s)",
                    unit.name(),
                    time[0]..time[time.len() - 1],
                    0.0..speed_max * 1.1,
                    &[PlotSeries {
                        data: speed_points,
                        label: String::new(),
                        color: ORANGE,
                        stroke_width: default_stroke(),
                    }],
                    &[],
                )?;

                // Order waterfall: speed on the X axis, display units.
                let speed_bins: Vec<f64> = bins_hz.iter().map(|&v| v * to_display).collect();
                let (i_min, i_max) = match f_range {
                    Some((lo, hi)) => frequency_range_indices(&spec.freqs, lo, hi),
                    None => (0, spec.freqs.len()),
                };
                let freqs_view = &spec.freqs[i_min..i_max];
                let matrix_view = spec
                    .matrix
                    .slice(ndarray::s![i_min..i_max, ..])
                    .to_owned();
                let y_view = match f_range {
                    Some((lo, hi)) => lo..hi,
                    None => 0.0..spec.freqs.last().copied().unwrap_or(1.0),
                };

                // Endpoints are in (speed_hz, freq_hz); convert the
                // speed coordinate for the display axis.
                let lines: Vec<(f64, [(f64, f64); 2])> = data
                    .order_cuts
                    .iter()
                    .map(|c| c.order)
                    .zip(data.order_lines.iter().map(|&[s, e]| {
                        [(s.0 * to_display, s.1), (e.0 * to_display, e.1)]
                    }))
                    .collect();

                draw_heatmap_chart(
                    &areas[2],
                    "Order Waterfall",
                    unit.name(),
                    "Frequency (Hz)",
                    &speed_bins,
                    freqs_view,
                    &matrix_view,
                    value_range,
                    y_view,
                    &lines,
                    LINE_WIDTH_ORDER_LINE,
                )?;
            }
            _ => {
                // Plain time/frequency waterfall.
                let (i_min, i_max) = match f_range {
                    Some((lo, hi)) => frequency_range_indices(&spec.freqs, lo, hi),
                    None => (0, spec.freqs.len()),
                };
                let matrix_view = spec
                    .matrix
                    .slice(ndarray::s![i_min..i_max, ..])
                    .to_owned();
                let y_view = match f_range {
                    Some((lo, hi)) => lo..hi,
                    None => 0.0..spec.freqs.last().copied().unwrap_or(1.0),
                };
                draw_heatmap_chart(
                    &areas[1],
                    "Waterfall",
                    "Time (s)",
                    "Frequency (Hz)",
                    &spec.bins,
                    &spec.freqs[i_min..i_max],
                    &matrix_view,
                    value_range,
                    y_view,
                    &[],
                    LINE_WIDTH_ORDER_LINE,
                )?;
            }
        }

        root.present()?;
        Ok(())
    };

    render().map_err(|e| AnalysisError::Render(e.to_string()))
}
