// src/signal_analysis/spectrogram.rs

use ndarray::{s, Array1, Array2};

use crate::constants::{DEFAULT_N_FFT, DEFAULT_PERCENT_OVERLAP, LOG_EPSILON};
use crate::error::{suggested_n_fft, AnalysisError};
use crate::signal_analysis::fft_utils;
use crate::signal_analysis::window::WindowKind;

/// Spectrum scaling emitted per transform window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectrumMode {
    /// Window-normalized magnitude, `|X_k| / sum(w)`.
    #[default]
    Magnitude,
    /// One-sided power spectral density,
    /// `|X_k|^2 / (fs * sum(w^2))`, doubled except at DC and Nyquist.
    Psd,
}

impl SpectrumMode {
    /// dB multiplier for this scaling: 20 for amplitude, 10 for power.
    pub fn db_factor(&self) -> f64 {
        match self {
            SpectrumMode::Magnitude => 20.0,
            SpectrumMode::Psd => 10.0,
        }
    }
}

/// Configuration for the spectrogram computation.
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    /// Number of points per transform window.
    pub n_fft: usize,
    /// Percent overlap between consecutive windows, in [0, 100).
    pub percent_overlap: f64,
    pub window: WindowKind,
    pub mode: SpectrumMode,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            n_fft: DEFAULT_N_FFT,
            percent_overlap: DEFAULT_PERCENT_OVERLAP,
            window: WindowKind::default(),
            mode: SpectrumMode::default(),
        }
    }
}

/// Time-frequency matrix plus its axes. Produced once per analysis and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Cell values, shape `(freq_bins, time_bins)`.
    pub matrix: Array2<f64>,
    /// Frequency of each row, strictly increasing.
    pub freqs: Vec<f64>,
    /// Center time of each column, in seconds relative to the first
    /// sample.
    pub bins: Vec<f64>,
    /// Scaling the matrix was computed with.
    pub mode: SpectrumMode,
}

impl Spectrogram {
    /// Converts every cell to a decibel scale, `20*log10` for magnitude
    /// and `10*log10` for power. Cells are floored at a small epsilon
    /// first so exact zeros stay finite.
    pub fn into_db(mut self) -> Self {
        let factor = self.mode.db_factor();
        self.matrix.mapv_inplace(|v| factor * v.max(LOG_EPSILON).log10());
        self
    }
}

/// Validates that an `n_fft`-point window fits the signal. On failure
/// the error names the largest power-of-two window that does fit.
pub fn check_num_points(num_points: usize, n_fft: usize) -> Result<(), AnalysisError> {
    if num_points >= n_fft {
        return Ok(());
    }
    match suggested_n_fft(num_points) {
        Some(suggested) => Err(AnalysisError::WindowTooLarge {
            n_fft,
            num_points,
            suggested,
        }),
        None => Err(AnalysisError::TooFewSamples { num_points }),
    }
}

/// Computes a spectrogram of a uniformly sampled signal.
///
/// The signal is partitioned into overlapping `n_fft`-point windows at
/// a hop of `n_fft - round(overlap/100 * n_fft)` samples. Each window
/// is detrended by subtracting its mean, multiplied by the window
/// function, and transformed; the one-sided spectrum is scaled per
/// `config.mode`.
pub fn compute_spectrogram(
    signal: &[f64],
    sample_rate: f64,
    config: &SpectrogramConfig,
) -> Result<Spectrogram, AnalysisError> {
    let total_len = signal.len();
    let n_fft = config.n_fft;
    check_num_points(total_len, n_fft)?;
    if n_fft < 2 {
        return Err(AnalysisError::TooFewSamples { num_points: n_fft });
    }

    let overlap_samples = (config.percent_overlap / 100.0 * n_fft as f64).round();
    if !(0.0..n_fft as f64).contains(&overlap_samples) {
        return Err(AnalysisError::InvalidOverlap {
            percent_overlap: config.percent_overlap,
            n_fft,
        });
    }
    let hop = n_fft - overlap_samples as usize;

    let window_func = config.window.samples(n_fft);
    let window_sum: f64 = window_func.iter().sum();
    let window_power: f64 = window_func.iter().map(|&w| w * w).sum();

    let num_freqs = fft_utils::one_sided_len(n_fft);
    let freqs = fft_utils::frequency_axis(n_fft, sample_rate);

    let signal = Array1::from_iter(signal.iter().copied());

    let mut bins = Vec::new();
    let mut spectra: Vec<Array1<f64>> = Vec::new();

    let mut start = 0;
    while start + n_fft <= total_len {
        let segment = signal.slice(s![start..start + n_fft]);

        // Mean detrend, then window.
        let segment_mean = segment.sum() / n_fft as f64;
        let windowed = Array1::from_iter(
            segment
                .iter()
                .zip(window_func.iter())
                .map(|(&v, &w)| (v - segment_mean) * w),
        );

        let spectrum = fft_utils::fft_forward(&windowed);
        debug_assert_eq!(spectrum.len(), num_freqs);

        let mut scaled = Array1::<f64>::zeros(num_freqs);
        for k in 0..num_freqs {
            scaled[k] = match config.mode {
                SpectrumMode::Magnitude => spectrum[k].norm() / window_sum,
                SpectrumMode::Psd => {
                    let mut psd = spectrum[k].norm_sqr() / (sample_rate * window_power);
                    let is_nyquist = n_fft % 2 == 0 && k == num_freqs - 1;
                    if k > 0 && !is_nyquist {
                        psd *= 2.0;
                    }
                    psd
                }
            };
        }

        bins.push((start as f64 + n_fft as f64 / 2.0) / sample_rate);
        spectra.push(scaled);
        start += hop;
    }

    let num_time_bins = spectra.len();
    let matrix = Array2::from_shape_fn((num_freqs, num_time_bins), |(freq_idx, time_idx)| {
        spectra[time_idx][freq_idx]
    });

    Ok(Spectrogram {
        matrix,
        freqs,
        bins,
        mode: config.mode,
    })
}
