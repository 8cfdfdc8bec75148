// src/signal_analysis/units.rs

use crate::error::AnalysisError;

/// Units an input shaft-speed signal may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    #[default]
    Rpm,
    Hertz,
    DegreesPerSecond,
}

impl SpeedUnit {
    /// Parse a unit tag. Accepts "rpm", "hz", and the deg/s spellings
    /// "deg/s", "degs/s", "deg/sec", "degs/sec" (case-insensitive).
    /// Anything else is an invalid-configuration error.
    pub fn from_name(name: &str) -> Result<Self, AnalysisError> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "rpm" => Ok(SpeedUnit::Rpm),
            "hz" => Ok(SpeedUnit::Hertz),
            "deg/s" | "degs/s" | "deg/sec" | "degs/sec" => Ok(SpeedUnit::DegreesPerSecond),
            _ => Err(AnalysisError::UnknownUnit(name.to_string())),
        }
    }

    /// Unit label for display.
    pub fn name(&self) -> &'static str {
        match self {
            SpeedUnit::Rpm => "RPM",
            SpeedUnit::Hertz => "Hz",
            SpeedUnit::DegreesPerSecond => "deg/s",
        }
    }

    /// Multiplier converting a value in this unit to Hz.
    pub fn to_hz_factor(&self) -> f64 {
        match self {
            SpeedUnit::Rpm => 1.0 / 60.0,
            SpeedUnit::Hertz => 1.0,
            SpeedUnit::DegreesPerSecond => 1.0 / 360.0,
        }
    }
}

/// Converts a shaft-speed signal to Hz, taking absolute magnitude —
/// only the rotational rate matters, not the direction.
pub fn convert_to_hz(signal: &[f64], unit: SpeedUnit) -> Vec<f64> {
    let factor = unit.to_hz_factor();
    signal.iter().map(|v| (v * factor).abs()).collect()
}

/// Associates each spectrogram time bin with an input-speed sample.
///
/// For bin time `b` (relative to the signal start) the chosen sample is
/// the first with `time[i] >= time[0] + b` — nearest-future semantics,
/// not nearest-by-distance. A bin past the last sample clamps to the
/// last sample.
pub fn speed_at_bins(
    bin_times: &[f64],
    time: &[f64],
    values: &[f64],
) -> Result<Vec<f64>, AnalysisError> {
    if time.len() != values.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: time.len(),
            actual: values.len(),
        });
    }
    if time.is_empty() {
        return Err(AnalysisError::TooFewSamples { num_points: 0 });
    }
    let t0 = time[0];
    let mapped = bin_times
        .iter()
        .map(|&b| {
            let target = t0 + b;
            let idx = time.partition_point(|&t| t < target);
            values[idx.min(values.len() - 1)]
        })
        .collect();
    Ok(mapped)
}
