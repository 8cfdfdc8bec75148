// src/plot_functions/plot_order_cuts.rs

use std::path::Path;

use plotters::drawing::IntoDrawingArea;
use plotters::prelude::BitMapBackend;
use plotters::style::colors::full_palette::PURPLE;
use plotters::style::colors::WHITE;

use crate::constants::{PLOT_HEIGHT, PLOT_WIDTH};
use crate::error::AnalysisError;
use crate::plot_framework::{calculate_range, default_stroke, draw_line_chart, PlotSeries};
use crate::signal_analysis::units::SpeedUnit;
use crate::signal_analysis::waterfall::WaterfallData;

/// Renders one stacked chart per extracted order cut: amplitude of the
/// order line as a function of shaft speed, speed in display units.
pub fn plot_order_cuts(
    data: &WaterfallData,
    unit: SpeedUnit,
    y_label: &str,
    output_path: &Path,
) -> Result<(), AnalysisError> {
    if data.order_cuts.is_empty() {
        log::warn!("no order cuts to plot; skipping {}", output_path.display());
        return Ok(());
    }

    let render = || -> Result<(), Box<dyn std::error::Error>> {
        let height = PLOT_HEIGHT / 3 * data.order_cuts.len() as u32;
        let root = BitMapBackend::new(output_path, (PLOT_WIDTH, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let areas = root.split_evenly((data.order_cuts.len(), 1));

        let to_display = 1.0 / unit.to_hz_factor();
        for (area, cut) in areas.iter().zip(data.order_cuts.iter()) {
            let points: Vec<(f64, f64)> = cut
                .points
                .iter()
                .map(|&(speed_hz, amp)| (speed_hz * to_display, amp))
                .collect();
            let (x_lo, x_hi) = calculate_range(
                points.iter().fold(f64::INFINITY, |m, p| m.min(p.0)),
                points.iter().fold(f64::NEG_INFINITY, |m, p| m.max(p.0)),
            );
            let (y_lo, y_hi) = calculate_range(
                points.iter().fold(f64::INFINITY, |m, p| m.min(p.1)),
                points.iter().fold(f64::NEG_INFINITY, |m, p| m.max(p.1)),
            );
            draw_line_chart(
                area,
                &format!("Order {:.1}", cut.order),
                unit.name(),
                y_label,
                x_lo..x_hi,
                y_lo..y_hi,
                &[PlotSeries {
                    data: points,
                    label: String::new(),
                    color: PURPLE,
                    stroke_width: default_stroke(),
                }],
                &[],
            )?;
        }

        root.present()?;
        Ok(())
    };

    render().map_err(|e| AnalysisError::Render(e.to_string()))
}
