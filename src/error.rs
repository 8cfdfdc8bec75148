// src/error.rs

use thiserror::Error;

/// Crate-wide error type. Every variant is an unrecoverable,
/// fail-fast condition for the current call; there is no transient
/// category since all computation is local and deterministic.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Fewer than 2 samples: no sample rate can be determined and no
    /// window size fits.
    #[error("signal has {num_points} sample(s); at least 2 are required")]
    TooFewSamples { num_points: usize },

    /// Transform window exceeds the available data. The message names
    /// the largest power-of-two window that fits.
    #[error("n_fft ({n_fft}) must not exceed the number of points in the signal ({num_points}); try {suggested}")]
    WindowTooLarge {
        n_fft: usize,
        num_points: usize,
        suggested: usize,
    },

    /// Overlap leaves no forward hop between windows.
    #[error("percent overlap ({percent_overlap}) leaves no hop between windows of {n_fft} points")]
    InvalidOverlap { percent_overlap: f64, n_fft: usize },

    #[error("'{0}' is not a recognized window function (expected hann, hamming, blackman, or rectangular)")]
    UnknownWindow(String),

    #[error("'{0}' is not a recognized speed unit (expected rpm, hz, or deg/s)")]
    UnknownUnit(String),

    /// Input-speed signal length differs from the response signal length.
    #[error("input signal length ({actual}) must match the response signal length ({expected})")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cutoff frequency ({cutoff_hz} Hz) must lie in (0, {nyquist_hz} Hz)")]
    InvalidCutoff { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("step end ({end}) must not precede step start ({start})")]
    InvalidStepRange { start: f64, end: f64 },

    /// Time vector is not strictly increasing.
    #[error("time values must be strictly increasing (violation at index {index})")]
    NonUniformTime { index: usize },

    #[error("table parse error: {0}")]
    Table(#[from] csv::Error),

    #[error("plot rendering failed: {0}")]
    Render(String),
}

/// Largest power of two that fits `num_points`, used to build the
/// `WindowTooLarge` suggestion. Scans candidate sizes in descending
/// power-of-two order; `None` when fewer than 2 points are available.
pub(crate) fn suggested_n_fft(num_points: usize) -> Option<usize> {
    (0..usize::BITS)
        .rev()
        .map(|e| 1usize << e)
        .find(|&pow_2| pow_2 <= num_points && pow_2 >= 2)
}
