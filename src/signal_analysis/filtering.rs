// src/signal_analysis/filtering.rs

use crate::constants::DEFAULT_FILTER_ORDER;
use crate::error::AnalysisError;

/// Second-order IIR low-pass section, bilinear transform with
/// pre-warped cutoff (RBJ cookbook form), Direct Form I.
#[derive(Debug, Clone)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    fn new_lowpass(cutoff_hz: f64, sample_rate_hz: f64, q: f64) -> Self {
        let omega = 2.0 * std::f64::consts::PI * cutoff_hz / sample_rate_hz;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    /// Seed the state as if `value` had been applied forever. Unity DC
    /// gain makes the steady output equal the input.
    fn reset_to(&mut self, value: f64) {
        self.x1 = value;
        self.x2 = value;
        self.y1 = value;
        self.y2 = value;
    }
}

/// First-order low-pass section for odd filter orders, bilinear
/// transform of `1/(s + 1)` with pre-warped cutoff.
#[derive(Debug, Clone)]
struct FirstOrder {
    b0: f64,
    a1: f64,
    x1: f64,
    y1: f64,
}

impl FirstOrder {
    fn new_lowpass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        let w = (std::f64::consts::PI * cutoff_hz / sample_rate_hz).tan();
        Self {
            b0: w / (1.0 + w),
            a1: (w - 1.0) / (1.0 + w),
            x1: 0.0,
            y1: 0.0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * (input + self.x1) - self.a1 * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    fn reset_to(&mut self, value: f64) {
        self.x1 = value;
        self.y1 = value;
    }
}

/// Butterworth low-pass of the given order as a cascade of sections.
/// Conjugate pole pairs at angle `theta_k = pi*(order - 2k + 1)/(2*order)`
/// from the negative real axis give section Q values `1/(2*cos(theta_k))`;
/// an odd order adds one real pole as a first-order section.
struct ButterworthCascade {
    biquads: Vec<Biquad>,
    first_order: Option<FirstOrder>,
}

impl ButterworthCascade {
    fn new(order: usize, cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        let n = order as f64;
        let biquads = (1..=order / 2)
            .map(|k| {
                let theta = std::f64::consts::PI * (n - 2.0 * k as f64 + 1.0) / (2.0 * n);
                let q = 1.0 / (2.0 * theta.cos());
                Biquad::new_lowpass(cutoff_hz, sample_rate_hz, q)
            })
            .collect();
        let first_order = if order % 2 == 1 {
            Some(FirstOrder::new_lowpass(cutoff_hz, sample_rate_hz))
        } else {
            None
        };
        Self {
            biquads,
            first_order,
        }
    }

    fn reset_to(&mut self, value: f64) {
        for section in &mut self.biquads {
            section.reset_to(value);
        }
        if let Some(section) = &mut self.first_order {
            section.reset_to(value);
        }
    }

    fn run(&mut self, signal: &mut [f64]) {
        if let Some(&first) = signal.first() {
            self.reset_to(first);
        }
        for v in signal.iter_mut() {
            let mut sample = *v;
            for section in &mut self.biquads {
                sample = section.process(sample);
            }
            if let Some(section) = &mut self.first_order {
                sample = section.process(sample);
            }
            *v = sample;
        }
    }
}

/// Odd (point-reflected) extension of `signal` by `pad_len` samples on
/// each end, so the filter sees a continuation without a level jump.
fn odd_extension(signal: &[f64], pad_len: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];
    let mut extended = Vec::with_capacity(n + 2 * pad_len);
    for i in (1..=pad_len).rev() {
        extended.push(2.0 * first - signal[i]);
    }
    extended.extend_from_slice(signal);
    for i in 1..=pad_len {
        extended.push(2.0 * last - signal[n - 1 - i]);
    }
    extended
}

/// Applies an order-`order` Butterworth low-pass filter with zero phase
/// shift (forward pass, then a second pass over the reversed signal).
///
/// The sample rate is taken from the first two time values. The signal
/// is padded with an odd reflection before filtering to suppress edge
/// transients; the padding is stripped from the result. An `order` of
/// zero is treated as one.
pub fn low_pass(
    signal: &[f64],
    time: &[f64],
    cutoff_hz: f64,
    order: usize,
) -> Result<Vec<f64>, AnalysisError> {
    if signal.len() < 2 || time.len() < 2 {
        return Err(AnalysisError::TooFewSamples {
            num_points: signal.len().min(time.len()),
        });
    }
    if time.len() != signal.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: signal.len(),
            actual: time.len(),
        });
    }
    let dt = time[1] - time[0];
    if dt <= 0.0 {
        return Err(AnalysisError::NonUniformTime { index: 1 });
    }
    let sample_rate = 1.0 / dt;
    let nyquist = sample_rate / 2.0;
    if cutoff_hz <= 0.0 || cutoff_hz >= nyquist {
        return Err(AnalysisError::InvalidCutoff {
            cutoff_hz,
            nyquist_hz: nyquist,
        });
    }
    let order = order.max(1);

    let pad_len = (3 * (order + 1)).min(signal.len() - 1);
    let mut extended = odd_extension(signal, pad_len);

    // Forward pass.
    ButterworthCascade::new(order, cutoff_hz, sample_rate).run(&mut extended);
    // Backward pass cancels the forward pass's phase shift.
    extended.reverse();
    ButterworthCascade::new(order, cutoff_hz, sample_rate).run(&mut extended);
    extended.reverse();

    Ok(extended[pad_len..pad_len + signal.len()].to_vec())
}

/// `low_pass` at the conventional 5th order.
pub fn low_pass5(signal: &[f64], time: &[f64], cutoff_hz: f64) -> Result<Vec<f64>, AnalysisError> {
    low_pass(signal, time, cutoff_hz, DEFAULT_FILTER_ORDER)
}
