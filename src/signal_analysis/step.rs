// src/signal_analysis/step.rs

use crate::error::AnalysisError;

/// Approximates the Heaviside step function with a cubic polynomial.
///
/// Values of `index` at or before `start` map to `init_val`, values at
/// or after `end` map to `final_val`, and values between follow the
/// smoothstep `init + h*u^2*(3 - 2u)` with `u = (x-start)/(end-start)`,
/// which joins both plateaus with zero slope.
///
/// `end == start` degenerates to a hard step (the transition interval
/// is empty); `end < start` is rejected.
pub fn step_function(
    index: &[f64],
    start: f64,
    init_val: f64,
    end: f64,
    final_val: f64,
) -> Result<Vec<f64>, AnalysisError> {
    if end < start {
        return Err(AnalysisError::InvalidStepRange { start, end });
    }
    let height = final_val - init_val;
    let step = index
        .iter()
        .map(|&x| {
            if x <= start {
                init_val
            } else if x >= end {
                final_val
            } else {
                let u = (x - start) / (end - start);
                init_val + height * u * u * (3.0 - 2.0 * u)
            }
        })
        .collect();
    Ok(step)
}
