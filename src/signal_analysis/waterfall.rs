// src/signal_analysis/waterfall.rs

use crate::error::AnalysisError;
use crate::signal_analysis::cleaning::clean_signal;
use crate::signal_analysis::orders::{order_cuts, order_line_endpoints, OrderCut};
use crate::signal_analysis::spectrogram::{compute_spectrogram, Spectrogram, SpectrogramConfig};
use crate::signal_analysis::units::{convert_to_hz, speed_at_bins, SpeedUnit};

/// Output scaling of the spectrogram cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmplitudeScale {
    #[default]
    Linear,
    /// `20*log10` for magnitude mode, `10*log10` for power mode.
    Decibel,
}

/// Configuration for a waterfall analysis.
#[derive(Debug, Clone)]
pub struct WaterfallConfig {
    pub spectrogram: SpectrogramConfig,
    pub scale: AmplitudeScale,
    /// When set, outliers beyond `n_sigma` standard deviations are
    /// replaced before the transform.
    pub clean_sigma: Option<f64>,
    /// Multiplier applied to the response signal (e.g. converting to
    /// g's). 1.0 leaves the signal unchanged.
    pub response_scale: f64,
    /// Unit the input-speed signal is expressed in.
    pub input_unit: SpeedUnit,
    /// Orders to extract cuts and line geometry for. Only used when an
    /// input-speed signal is supplied.
    pub orders: Vec<f64>,
    /// Display frequency range `(min_hz, max_hz)`; bounds the order-line
    /// geometry. The spectrogram itself is never clipped.
    pub f_range: Option<(f64, f64)>,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            spectrogram: SpectrogramConfig::default(),
            scale: AmplitudeScale::default(),
            clean_sigma: None,
            response_scale: 1.0,
            input_unit: SpeedUnit::default(),
            orders: Vec::new(),
            f_range: None,
        }
    }
}

/// Complete result set of a waterfall analysis: plain arrays for any
/// downstream consumer (plotting included). Immutable once returned.
#[derive(Debug, Clone)]
pub struct WaterfallData {
    /// Response signal after cleaning and scaling.
    pub signal: Vec<f64>,
    /// Indices replaced by the outlier cleaner, ascending.
    pub removed_indices: Vec<usize>,
    pub spectrogram: Spectrogram,
    /// Input-speed trace converted to Hz, one value per sample.
    /// `None` when no input-speed signal was supplied.
    pub speed_trace_hz: Option<Vec<f64>>,
    /// Input speed in Hz per spectrogram column.
    pub speed_bins_hz: Option<Vec<f64>>,
    /// One cut per requested order, in request order.
    pub order_cuts: Vec<OrderCut>,
    /// Endpoints of each requested order line in
    /// `(speed_hz, frequency_hz)` coordinates, clipped to the visible
    /// frequency ceiling.
    pub order_lines: Vec<[(f64, f64); 2]>,
}

/// Runs the waterfall pipeline: outlier cleaning, response scaling,
/// spectrogram, optional dB conversion, and — when an input-speed
/// signal is supplied — speed-bin mapping and order-cut extraction.
///
/// Fails fast on any invalid configuration; no partial results are
/// produced.
pub fn compute_waterfall(
    time: &[f64],
    signal: &[f64],
    input_speed: Option<&[f64]>,
    config: &WaterfallConfig,
) -> Result<WaterfallData, AnalysisError> {
    if time.len() < 2 {
        return Err(AnalysisError::TooFewSamples {
            num_points: time.len(),
        });
    }
    if time.len() != signal.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: time.len(),
            actual: signal.len(),
        });
    }
    if let Some(idx) = time.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AnalysisError::NonUniformTime { index: idx + 1 });
    }
    if let Some(input) = input_speed {
        if input.len() != signal.len() {
            return Err(AnalysisError::LengthMismatch {
                expected: signal.len(),
                actual: input.len(),
            });
        }
    }

    let (mut cleaned, removed_indices) = match config.clean_sigma {
        Some(n_sigma) => clean_signal(signal, n_sigma),
        None => (signal.to_vec(), Vec::new()),
    };
    if config.response_scale != 1.0 {
        for v in &mut cleaned {
            *v *= config.response_scale;
        }
    }

    let t_s = (time[time.len() - 1] - time[0]) / (time.len() - 1) as f64;
    let sample_rate = 1.0 / t_s;

    let spectrogram = compute_spectrogram(&cleaned, sample_rate, &config.spectrogram)?;
    log::debug!(
        "waterfall window duration: {} s ({} points at {} Hz)",
        config.spectrogram.n_fft as f64 * t_s,
        config.spectrogram.n_fft,
        sample_rate
    );

    let spectrogram = match config.scale {
        AmplitudeScale::Linear => spectrogram,
        AmplitudeScale::Decibel => spectrogram.into_db(),
    };

    let mut speed_trace_hz = None;
    let mut speed_bins_hz = None;
    let mut cuts = Vec::new();
    let mut order_lines = Vec::new();

    if let Some(input) = input_speed {
        let trace = convert_to_hz(input, config.input_unit);
        let bins = speed_at_bins(&spectrogram.bins, time, &trace)?;

        if !config.orders.is_empty() {
            cuts = order_cuts(&bins, &spectrogram.freqs, &spectrogram.matrix, &config.orders);

            let x_max = bins.iter().fold(0.0f64, |m, &v| m.max(v));
            let f_ceiling = config
                .f_range
                .map(|(_, max)| max)
                .or_else(|| spectrogram.freqs.last().copied())
                .unwrap_or(0.0);
            order_lines = config
                .orders
                .iter()
                .map(|&order| order_line_endpoints(order, 1.0, x_max, f_ceiling))
                .collect();
        }

        speed_trace_hz = Some(trace);
        speed_bins_hz = Some(bins);
    }

    Ok(WaterfallData {
        signal: cleaned,
        removed_indices,
        spectrogram,
        speed_trace_hz,
        speed_bins_hz,
        order_cuts: cuts,
        order_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_analysis::spectrogram::SpectrumMode;

    fn ramp_rig(n: usize, fs: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        // Shaft sweeping 600 -> 3000 RPM with a first-order excitation.
        let mut time = Vec::with_capacity(n);
        let mut speed_rpm = Vec::with_capacity(n);
        let mut signal = Vec::with_capacity(n);
        let mut phase = 0.0;
        for i in 0..n {
            let t = i as f64 / fs;
            let rpm = 600.0 + (3000.0 - 600.0) * t / (n as f64 / fs);
            let hz = rpm / 60.0;
            phase += 2.0 * std::f64::consts::PI * hz / fs;
            time.push(t);
            speed_rpm.push(rpm);
            signal.push(phase.sin());
        }
        (time, signal, speed_rpm)
    }

    fn base_config() -> WaterfallConfig {
        WaterfallConfig {
            spectrogram: SpectrogramConfig {
                n_fft: 256,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_pipeline_without_input_speed() {
        let (time, signal, _) = ramp_rig(4096, 1000.0);
        let data = compute_waterfall(&time, &signal, None, &base_config()).unwrap();
        assert!(data.speed_trace_hz.is_none());
        assert!(data.speed_bins_hz.is_none());
        assert!(data.order_cuts.is_empty());
        assert_eq!(data.signal.len(), signal.len());
        assert_eq!(
            data.spectrogram.matrix.shape()[1],
            data.spectrogram.bins.len()
        );
    }

    #[test]
    fn test_pipeline_with_orders() {
        let (time, signal, speed) = ramp_rig(8192, 1000.0);
        let mut config = base_config();
        config.orders = vec![1.0, 2.0];
        let data = compute_waterfall(&time, &signal, Some(&speed), &config).unwrap();

        let bins = data.speed_bins_hz.as_ref().unwrap();
        assert_eq!(bins.len(), data.spectrogram.bins.len());
        assert_eq!(data.order_cuts.len(), 2);
        assert_eq!(data.order_cuts[0].points.len(), bins.len());
        assert_eq!(data.order_lines.len(), 2);

        // Speed bins are in Hz: the sweep stays within 10..50 Hz.
        assert!(bins.iter().all(|&v| (9.0..51.0).contains(&v)));

        // The first-order cut should carry most of the energy: its mean
        // amplitude beats a mismatched high order's cut.
        config.orders = vec![7.5];
        let off = compute_waterfall(&time, &signal, Some(&speed), &config).unwrap();
        let mean = |c: &OrderCut| {
            c.points.iter().map(|p| p.1).sum::<f64>() / c.points.len() as f64
        };
        assert!(mean(&data.order_cuts[0]) > 5.0 * mean(&off.order_cuts[0]));
    }

    #[test]
    fn test_cleaning_reported_in_result() {
        let (time, mut signal, _) = ramp_rig(2048, 1000.0);
        signal[700] = 1000.0;
        let mut config = base_config();
        config.clean_sigma = Some(4.0);
        let data = compute_waterfall(&time, &signal, None, &config).unwrap();
        assert_eq!(data.removed_indices, vec![700]);
        assert!(data.signal[700].abs() < 2.0);
    }

    #[test]
    fn test_response_scale_applied() {
        let (time, signal, _) = ramp_rig(1024, 1000.0);
        let mut config = base_config();
        config.response_scale = 9.81;
        let data = compute_waterfall(&time, &signal, None, &config).unwrap();
        assert!((data.signal[100] - signal[100] * 9.81).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_input_speed_rejected() {
        let (time, signal, _) = ramp_rig(1024, 1000.0);
        let short = vec![0.0; 10];
        let err = compute_waterfall(&time, &signal, Some(&short), &base_config());
        assert!(matches!(err, Err(AnalysisError::LengthMismatch { .. })));
    }

    #[test]
    fn test_non_increasing_time_rejected() {
        let time = vec![0.0, 1.0, 1.0, 2.0];
        let signal = vec![0.0; 4];
        assert!(matches!(
            compute_waterfall(&time, &signal, None, &base_config()),
            Err(AnalysisError::NonUniformTime { index: 2 })
        ));
    }

    #[test]
    fn test_decibel_scale_respects_mode() {
        let (time, signal, _) = ramp_rig(2048, 1000.0);
        let mut config = base_config();
        config.scale = AmplitudeScale::Decibel;
        config.spectrogram.mode = SpectrumMode::Psd;
        let linear = {
            let mut c = config.clone();
            c.scale = AmplitudeScale::Linear;
            compute_waterfall(&time, &signal, None, &c).unwrap()
        };
        let db = compute_waterfall(&time, &signal, None, &config).unwrap();
        let lin_cell: f64 = linear.spectrogram.matrix[[10, 0]];
        let db_cell = db.spectrogram.matrix[[10, 0]];
        assert!((db_cell - 10.0 * lin_cell.max(1e-12).log10()).abs() < 1e-9);
    }

    #[test]
    fn test_order_lines_clipped_by_f_range() {
        let (time, signal, speed) = ramp_rig(4096, 1000.0);
        let mut config = base_config();
        config.orders = vec![10.0];
        config.f_range = Some((0.0, 100.0));
        let data = compute_waterfall(&time, &signal, Some(&speed), &config).unwrap();
        let [_, end] = data.order_lines[0];
        assert!(end.1 <= 100.0 + 1e-9);
    }

    #[test]
    fn test_pipeline_deterministic() {
        let (time, signal, speed) = ramp_rig(4096, 1000.0);
        let mut config = base_config();
        config.orders = vec![1.0];
        let a = compute_waterfall(&time, &signal, Some(&speed), &config).unwrap();
        let b = compute_waterfall(&time, &signal, Some(&speed), &config).unwrap();
        assert_eq!(a.spectrogram.matrix, b.spectrogram.matrix);
        assert_eq!(a.speed_bins_hz, b.speed_bins_hz);
    }
}
