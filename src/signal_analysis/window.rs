// src/signal_analysis/window.rs

use ndarray::Array1;

use crate::error::AnalysisError;

/// Window functions applied to each transform segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// Boxcar window; the default when no window is requested.
    #[default]
    Rectangular,
    Hann,
    Hamming,
    Blackman,
}

impl WindowKind {
    /// Parse a window name. Accepts the spellings the analysis scripts
    /// in the field use ("hanning" alongside "hann", "boxcar" alongside
    /// "rectangular"); anything else is an invalid-configuration error.
    pub fn from_name(name: &str) -> Result<Self, AnalysisError> {
        match name.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "rectangular" | "boxcar" => Ok(WindowKind::Rectangular),
            _ => Err(AnalysisError::UnknownWindow(name.to_string())),
        }
    }

    /// Window name for display.
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
        }
    }

    /// Generates the symmetric window of length `num`.
    pub fn samples(&self, num: usize) -> Array1<f64> {
        use std::f64::consts::PI;
        if num == 0 {
            return Array1::zeros(0);
        }
        if num == 1 {
            return Array1::ones(1);
        }
        let nm1 = (num - 1) as f64;
        match self {
            WindowKind::Rectangular => Array1::ones(num),
            WindowKind::Hann => Array1::from_iter(
                (0..num).map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / nm1).cos()),
            ),
            WindowKind::Hamming => Array1::from_iter(
                (0..num).map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / nm1).cos()),
            ),
            WindowKind::Blackman => Array1::from_iter((0..num).map(|i| {
                let x = 2.0 * PI * i as f64 / nm1;
                0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos()
            })),
        }
    }
}
